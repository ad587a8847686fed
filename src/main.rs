use bitboard_chess::config::RulesConfig;
use bitboard_chess::mock;

fn main() {
    log::info!("Bitboard Chess - terminal");
    mock::run_interactive_terminal(RulesConfig::default());
}
