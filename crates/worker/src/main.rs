use anyhow::Context;
use clap::{Parser, Subcommand};
use curator_core::domain::profile::Responses;
use curator_core::llm::anthropic::AnthropicClient;
use curator_core::news::feed::FeedOptions;
use curator_core::news::provider::{NewsApiClient, DEFAULT_SYMBOL_NEWS_LIMIT};
use curator_core::questionnaire::Questionnaire;
use curator_core::storage::profiles::ProfileStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "curator_worker")]
struct Args {
    /// Profile store file. Overrides PROFILE_STORE_PATH.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the questionnaire as JSON.
    Questions,

    /// Validate questionnaire answers (JSON file) and save the profile.
    CreateProfile {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        responses: PathBuf,
    },

    /// Print a stored profile.
    ShowProfile {
        #[arg(long)]
        user_id: String,
    },

    /// Apply field updates (JSON file keyed by profile attribute) to a stored profile.
    UpdateProfile {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        updates: PathBuf,
    },

    /// Show what a set of answers would produce, without saving anything.
    Preview {
        #[arg(long)]
        responses: PathBuf,
    },

    /// Fetch news and generate a personalized digest for a stored profile.
    Digest {
        #[arg(long)]
        user_id: String,

        /// Fetch news and print the crew briefs, but do not call the LLM.
        #[arg(long)]
        dry_run: bool,
    },

    /// Print recent news for one stock ticker.
    StockNews {
        #[arg(long)]
        symbol: String,

        #[arg(long, default_value_t = DEFAULT_SYMBOL_NEWS_LIMIT)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = curator_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let store_path = args
        .store
        .clone()
        .unwrap_or_else(|| settings.profile_store_path.clone());
    let store = ProfileStore::open(&store_path)
        .with_context(|| format!("failed to load profile store at {}", store_path.display()))?;
    let questionnaire = Questionnaire::new(Arc::new(store));

    let res = run(args.command, &questionnaire, &settings).await;
    if let Err(err) = &res {
        sentry_anyhow::capture_anyhow(err);
    }
    res
}

async fn run(
    command: Command,
    questionnaire: &Questionnaire,
    settings: &curator_core::config::Settings,
) -> anyhow::Result<()> {
    match command {
        Command::Questions => {
            print_json(&questionnaire.get_all_questions())?;
        }
        Command::CreateProfile { user_id, responses } => {
            let responses = read_json_object(&responses)?;
            let profile = questionnaire.create_profile_from_responses(&user_id, &responses)?;
            tracing::info!(%user_id, "profile created");
            print_json(&profile)?;
        }
        Command::ShowProfile { user_id } => {
            let profile = questionnaire
                .store()
                .get_profile(&user_id)
                .with_context(|| format!("no profile for user {user_id}"))?;
            print_json(&profile)?;
        }
        Command::UpdateProfile { user_id, updates } => {
            let updates = read_json_object(&updates)?;
            let profile = questionnaire.store().update_profile(&user_id, &updates)?;
            print_json(&profile)?;
        }
        Command::Preview { responses } => {
            let responses = read_json_object(&responses)?;
            let errors = questionnaire.validate_responses(&responses);
            println!("{}", questionnaire.get_recommendation_preview(&responses));
            if !errors.is_empty() {
                eprintln!("\nStill to fix before saving:");
                for e in errors {
                    eprintln!("- {e}");
                }
            }
        }
        Command::Digest { user_id, dry_run } => {
            let profile = questionnaire
                .store()
                .get_profile(&user_id)
                .with_context(|| format!("no profile for user {user_id}"))?;
            let news = NewsApiClient::from_settings(settings)?;
            let opts = FeedOptions::from_env();
            let today = chrono::Utc::now().date_naive();

            if dry_run {
                let articles =
                    curator_core::news::feed::collect_articles(&news, &profile, &opts, today)
                        .await?;
                tracing::info!(
                    %user_id,
                    dry_run = true,
                    articles = articles.len(),
                    "digest dry run"
                );
                let crew = curator_core::crew::NewsCrew::new(profile);
                print_json(&serde_json::json!({
                    "tasks": crew.tasks(),
                    "articles": articles,
                }))?;
                return Ok(());
            }

            let llm = AnthropicClient::from_settings(settings)?;
            let digest =
                curator_core::digest::generate_digest(profile, &news, &llm, &opts, today).await?;
            print_json(&digest)?;
        }
        Command::StockNews { symbol, limit } => {
            let news = NewsApiClient::from_settings(settings)?;
            let articles = curator_core::news::feed::symbol_news(
                &news,
                &symbol,
                limit,
                &FeedOptions::from_env(),
                chrono::Utc::now().date_naive(),
            )
            .await?;
            print_json(&articles)?;
        }
    }
    Ok(())
}

fn read_json_object(path: &Path) -> anyhow::Result<Responses> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str::<Responses>(&text)
        .with_context(|| format!("{} must contain a JSON object", path.display()))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_sentry(settings: &curator_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
