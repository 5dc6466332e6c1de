use underchex::tablebase::{Tablebases, TABLEBASE_CONFIGS};

fn main() {
    env_logger::init();
    log::info!("underchex tablegen, built {}", env!("BUILD_TIMESTAMP"));

    let mut tablebases = Tablebases::new();
    tablebases.generate_all();

    println!("=== Endgame tablebase statistics ===\n");
    for config in TABLEBASE_CONFIGS {
        let table = tablebases.table(config);
        let (wins, draws, losses) = table.counts();
        let total = table.len();
        println!("{}:", config.name());
        println!("  positions: {total}");
        if total > 0 {
            let pct = |n: usize| 100.0 * n as f64 / total as f64;
            println!("  wins:   {wins} ({:.1}%)", pct(wins));
            println!("  draws:  {draws} ({:.1}%)", pct(draws));
            println!("  losses: {losses} ({:.1}%)", pct(losses));
        }
        println!();
    }

    println!(
        "{}",
        serde_json::to_string(&tablebases.stats()).expect("stats serialize")
    );
}
