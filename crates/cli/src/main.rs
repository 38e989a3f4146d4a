use clap::{Parser, Subcommand};
use rxpad_core::TemplateDraft;
use rxpad_gateway::{HttpTemplateStore, LoadOutcome, SaveOutcome, TemplateGateway};
use rxpad_render::{paginate, PageSpec, PrintDocument};
use rxpad_uuid::UserUuid;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rxpad")]
#[command(about = "RxPad prescription template CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a template payload file and report every violation
    Validate {
        /// Path to a template JSON file
        file: PathBuf,
    },
    /// Show the print layout (pages and blocks) for a template file
    Preview {
        /// Path to a template JSON file
        file: PathBuf,
    },
    /// Show the current user's stored template
    Show,
    /// Save a template file to the store (create or update)
    Save {
        /// Path to a template JSON file
        file: PathBuf,
    },
    /// Delete a stored template by id
    Delete {
        /// Stored template identifier
        id: String,
    },
}

fn read_draft(file: &PathBuf) -> Result<TemplateDraft, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(file)?;
    let draft: TemplateDraft = serde_json::from_str(&contents)?;
    Ok(draft)
}

/// Builds a gateway from `RXPAD_API_URL` (default http://localhost:3000)
/// and `RXPAD_USER_ID` (required, canonical 32-hex).
fn gateway() -> Result<TemplateGateway<HttpTemplateStore>, Box<dyn std::error::Error>> {
    let base_url =
        std::env::var("RXPAD_API_URL").unwrap_or_else(|_| "http://localhost:3000".into());
    let user_id = std::env::var("RXPAD_USER_ID")
        .map_err(|_| "RXPAD_USER_ID must be set to a canonical user id")?;
    let user_id = UserUuid::parse(&user_id)?;

    Ok(TemplateGateway::new(HttpTemplateStore::new(
        &base_url, user_id,
    )?))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate { file }) => {
            let draft = read_draft(&file)?;
            let issues = draft.validate();
            if issues.is_empty() {
                println!("OK: template is valid.");
            } else {
                println!("{} issue(s) found:", issues.len());
                for issue in &issues {
                    println!("  - {}", issue);
                }
                std::process::exit(1);
            }
        }
        Some(Commands::Preview { file }) => {
            let template = read_draft(&file)?.into_template()?;
            let document = PrintDocument::build(&template);
            let spec = PageSpec::default();
            let pages = paginate(&document.blocks, spec.page_height_px());

            println!(
                "Theme colour {} - {} page(s) at {}x{}px",
                document.color,
                pages.len(),
                spec.raster_size().0,
                spec.raster_size().1,
            );
            for (number, page) in pages.iter().enumerate() {
                println!(
                    "Page {}/{} ({}px of {}px)",
                    number + 1,
                    pages.len(),
                    page.content_height_px,
                    spec.page_height_px(),
                );
                for block in &page.blocks {
                    println!("  {:<8} | {}", block.kind.to_string(), block.text);
                }
            }
        }
        Some(Commands::Show) => {
            let gateway = gateway()?;
            match gateway.load_default().await {
                LoadOutcome::Seeded(stored) => {
                    println!(
                        "Template {} ({} component(s), colour {}, updated {})",
                        stored.id,
                        stored.components.len(),
                        stored.color,
                        stored.updated_at,
                    );
                    for component in &stored.components {
                        println!("  {:<8} | {}", component.kind.to_string(), component.display_text());
                    }
                }
                LoadOutcome::Empty => println!("No stored template."),
                LoadOutcome::Unavailable(message) => eprintln!("{}", message),
            }
        }
        Some(Commands::Save { file }) => {
            let draft = read_draft(&file)?;
            let gateway = gateway()?;
            match gateway.save(&draft).await {
                Ok(SaveOutcome::Created(stored)) => {
                    println!("Created template {}", stored.id);
                }
                Ok(SaveOutcome::Updated(stored)) => {
                    println!("Updated template {}", stored.id);
                }
                Err(e) => {
                    eprintln!("Save failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Delete { id }) => {
            let gateway = gateway()?;
            match gateway.delete(&id).await {
                Ok(()) => println!("Deleted template {}", id),
                Err(e) => {
                    eprintln!("Delete failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("rxpad: use --help to see available commands");
        }
    }

    Ok(())
}
