//! Console front end for the stopwatch core.
//!
//! Commands (single letters mirror the keyboard shortcuts):
//!   <enter> / t  toggle start/pause
//!   l            record a lap
//!   r            reset
//!   s            dump the current snapshot as JSON
//!   q            quit

use std::io::Write as _;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use lapwatch::{format_elapsed, StopwatchController, StopwatchSnapshot};

fn render_display(snapshot: &StopwatchSnapshot) {
    print!(
        "\r{}  [{}]  laps: {}   ",
        format_elapsed(snapshot.elapsed_ms),
        snapshot.hints.primary_label.as_str(),
        snapshot.state.laps.len()
    );
    let _ = std::io::stdout().flush();
}

fn render_laps(snapshot: &StopwatchSnapshot) {
    println!();
    if snapshot.state.laps.is_empty() {
        println!("no laps recorded yet");
        return;
    }
    let total = snapshot.state.laps.len();
    for (index, lap) in snapshot.state.laps.iter().enumerate() {
        println!("lap {:>3}  {}", total - index, format_elapsed(*lap));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let controller = StopwatchController::new();

    let mut updates = controller.subscribe();
    render_display(&updates.borrow_and_update().clone());
    let display = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            render_display(&snapshot);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let hints = controller.snapshot().await.hints;
        match line.trim() {
            "" | "t" | "toggle" => controller.toggle().await,
            "l" | "lap" => {
                // shortcuts obey the same enablement rules as the buttons
                if hints.lap_enabled {
                    controller.record_lap().await;
                    render_laps(&controller.snapshot().await);
                }
            }
            "r" | "reset" => {
                if hints.reset_enabled {
                    controller.reset().await;
                }
            }
            "s" | "state" => {
                let snapshot = controller.snapshot().await;
                println!("\n{}", serde_json::to_string_pretty(&snapshot)?);
            }
            "q" | "quit" => break,
            other => println!("\nunknown command: {other:?} (try t, l, r, s, q)"),
        }
    }

    // tear down: cancel the periodic tick before exiting
    controller.pause().await;
    display.abort();
    println!();

    Ok(())
}
