use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use content_client::ContentClient;
use shared::domain::{CampaignEntry, CatalogEntry, FetchState, FilterSelection};
use site_core::{
    featured::featured_view, form::FormMachine, load_campaigns, load_home, load_products,
    load_settings, view_model::filter_state, SubmitOutcome,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Render brochure-site content from the headless CMS")]
struct Args {
    /// Print view models as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Product catalog from the content service.
    Products {
        #[arg(long, default_value = "all")]
        filter: FilterSelection,
    },
    Campaigns,
    /// Bundled landing-page lineup.
    Featured {
        #[arg(long, default_value = "all")]
        filter: FilterSelection,
    },
    /// Products and campaigns together, as the landing page loads them.
    Home,
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
    Newsletter {
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings();
    let config = settings
        .content_service_config()
        .context("invalid content service configuration")?;
    info!(base_url = config.base_url(), "using content service");
    let client = ContentClient::new(config);

    match args.command {
        Command::Products { filter } => {
            let state = filter_state(&load_products(&client).await, filter);
            print_catalog(&state, args.json)?;
        }
        Command::Campaigns => {
            let state = load_campaigns(&client).await;
            print_campaigns(&state, args.json)?;
        }
        Command::Featured { filter } => {
            let site_url = settings
                .validated_site_url()
                .context("invalid site url")?;
            let state = FetchState::Ready {
                items: featured_view(&site_url, filter),
            };
            print_catalog(&state, args.json)?;
        }
        Command::Home => {
            let home = load_home(&client).await;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&home)?);
            } else {
                print_catalog(&home.products, false)?;
                println!();
                print_campaigns(&home.campaigns, false)?;
            }
        }
        Command::Contact {
            name,
            email,
            message,
        } => {
            let mut form = FormMachine::contact();
            form.edit("name", name)?;
            form.edit("email", email)?;
            form.edit("message", message)?;
            submit_form(form, &client, args.json).await?;
        }
        Command::Newsletter { email } => {
            let mut form = FormMachine::newsletter();
            form.edit("email", email)?;
            submit_form(form, &client, args.json).await?;
        }
    }

    Ok(())
}

async fn submit_form(mut form: FormMachine, client: &ContentClient, json: bool) -> Result<()> {
    let outcome = form.submit(client).await;
    if json {
        println!("{}", serde_json::to_string_pretty(form.state())?);
    } else if let Some(message) = form.message() {
        println!("{message}");
    }
    if outcome != SubmitOutcome::Succeeded {
        bail!("{:?} submission did not succeed: {outcome:?}", form.kind());
    }
    Ok(())
}

fn print_catalog(state: &FetchState<CatalogEntry>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
        return Ok(());
    }
    match state {
        FetchState::Loading => println!("Loading products..."),
        FetchState::Empty => println!("No products available."),
        FetchState::Error { message } => println!("{message}"),
        FetchState::Ready { items } if items.is_empty() => {
            println!("No products match this filter.")
        }
        FetchState::Ready { items } => {
            for entry in items {
                let price = entry
                    .price
                    .map(|price| format!(" ({price:.2})"))
                    .unwrap_or_default();
                println!("{}{price}", entry.name);
                println!("  {}", entry.description);
                match &entry.media_url {
                    Some(url) => println!("  image: {url}"),
                    None => println!("  No Image Available"),
                }
            }
        }
    }
    Ok(())
}

fn print_campaigns(state: &FetchState<CampaignEntry>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
        return Ok(());
    }
    match state {
        FetchState::Loading => println!("Loading campaigns..."),
        FetchState::Empty => println!("No campaigns running."),
        FetchState::Error { message } => println!("{message}"),
        FetchState::Ready { items } => {
            for campaign in items {
                println!("{}", campaign.title);
                println!("  {}", campaign.summary);
            }
        }
    }
    Ok(())
}
