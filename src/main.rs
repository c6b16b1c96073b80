// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;

use g318_story_map::{Catalog, Route};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("catalog") => {
            print_catalog();
            Ok(())
        }
        Some("info") => {
            print_info();
            Ok(())
        }
        _ => run_ui_mode(),
    }
}

fn print_catalog() {
    println!("🗺️  G318 Story Map - Catalog");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let catalog = Catalog::with_defaults();
    let route = Route::g318();

    for poi in catalog.iter() {
        println!(
            "  {:>2}. {:<34} {:<14} {}",
            poi.id,
            poi.name,
            poi.poi_type.as_str(),
            poi.distance
        );
    }

    println!();
    println!(
        "✓ {} stops along about {:.0} km of route",
        catalog.len(),
        route.total_length_km()
    );
}

fn print_info() {
    println!("🏔️  G318 Story Map");
    println!();
    println!("An interactive map of the scenery along China National Highway 318,");
    println!("from Shanghai to Lhasa.");
    println!();
    println!("Features:");
    println!("  • Open a stop to read its story and travel tips");
    println!("  • Search to find stops quickly");
    println!("  • Track which stops you have visited");
    println!("  • Follow the route segment by segment");
    println!();
    println!("Enjoy the journey!");
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    use std::sync::Arc;

    println!("🖥️  Loading G318 Story Map...\n");

    let catalog = Arc::new(Catalog::with_defaults());
    println!("📍 Loaded {} points of interest", catalog.len());
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(catalog);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the web API: cargo run --bin g318-server --features server");
    std::process::exit(1);
}
