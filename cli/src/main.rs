use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use client::config::{ClientConfig, ConfigError};
use client::net::api::{ApiError, HttpLeadApi, LeadApi, PageQuery};
use client::submission::{Submission, SubmissionClient, SubmissionError};
use leads::{InquiryStatus, InquirySubmission, SampleRequestSubmission};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("request failed: {0}")]
    Api(#[from] ApiError),
    #[error("{}", submission_message(.0))]
    Submission(#[from] SubmissionError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

fn submission_message(err: &SubmissionError) -> String {
    match err {
        SubmissionError::Invalid(validation) => {
            format!("{} ({})", validation.user_message(), validation.fields().join(", "))
        }
        other => format!("{} [{other}]", other.reason()),
    }
}

#[derive(Parser, Debug)]
#[command(name = "chaitrade-cli", about = "ChaiTrade lead API CLI")]
struct Cli {
    #[arg(long, env = "CHAITRADE_BASE_URL", default_value = client::config::DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "CHAITRADE_ADMIN_TOKEN")]
    admin_token: Option<String>,

    #[arg(long, env = "CHAITRADE_SUBMISSION_TIMEOUT_MS")]
    timeout_ms: Option<String>,

    #[arg(long, env = "CHAITRADE_EMAIL_POLICY")]
    email_policy: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up.
    Ping,
    Inquiry(InquiryCommand),
    Sample(SampleCommand),
    Admin(AdminCommand),
}

#[derive(Args, Debug)]
struct InquiryCommand {
    #[command(subcommand)]
    command: InquirySubcommand,
}

#[derive(Subcommand, Debug)]
enum InquirySubcommand {
    Submit(InquiryArgs),
}

#[derive(Args, Debug, Clone)]
struct ContactArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    company: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long, help = "Region slug for inquiries, free text for sample requests")]
    country: Option<String>,
}

#[derive(Args, Debug)]
struct InquiryArgs {
    #[command(flatten)]
    contact: ContactArgs,
    #[arg(long, help = "samples, pricing, bulk, partnership or other")]
    interest: Option<String>,
    #[arg(long)]
    message: Option<String>,
}

#[derive(Args, Debug)]
struct SampleCommand {
    #[command(subcommand)]
    command: SampleSubcommand,
}

#[derive(Subcommand, Debug)]
enum SampleSubcommand {
    Submit(SampleArgs),
}

#[derive(Args, Debug)]
struct SampleArgs {
    #[command(flatten)]
    contact: ContactArgs,
    #[arg(long = "tea-type", help = "Catalog label, e.g. \"Green Tea - SENCHA STYLE\"; repeatable")]
    tea_types: Vec<String>,
    #[arg(long)]
    quantities: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args, Debug)]
struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Args, Debug, Clone, Default)]
struct PageArgs {
    #[arg(long)]
    page_size: Option<u32>,
    #[arg(long)]
    cursor: Option<String>,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    /// List inquiries, newest first.
    List {
        #[arg(long, value_parser = parse_status)]
        status: Option<InquiryStatus>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// List sample requests, newest first.
    Samples {
        #[command(flatten)]
        page: PageArgs,
    },
    Analytics,
    SetStatus {
        id: Uuid,
        #[arg(value_parser = parse_status)]
        status: InquiryStatus,
    },
}

fn parse_status(raw: &str) -> Result<InquiryStatus, String> {
    raw.trim().parse::<InquiryStatus>().map_err(|err| err.to_string())
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = client_config(&cli)?;
    tracing::debug!(?config, "cli config");
    let api = Arc::new(HttpLeadApi::new(&config)?);

    match cli.command {
        Command::Ping => {
            api.health().await?;
            println!("ok");
            Ok(())
        }
        Command::Inquiry(InquiryCommand { command: InquirySubcommand::Submit(args) }) => {
            submit(api, &config, inquiry_submission(args).into()).await
        }
        Command::Sample(SampleCommand { command: SampleSubcommand::Submit(args) }) => {
            submit(api, &config, sample_submission(args).into()).await
        }
        Command::Admin(admin) => run_admin(api.as_ref(), admin).await,
    }
}

fn client_config(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    ClientConfig::from_lookup(|key| match key {
        "CHAITRADE_BASE_URL" => Some(cli.base_url.clone()),
        "CHAITRADE_SUBMISSION_TIMEOUT_MS" => cli.timeout_ms.clone(),
        "CHAITRADE_ADMIN_TOKEN" => cli.admin_token.clone(),
        "CHAITRADE_EMAIL_POLICY" => cli.email_policy.clone(),
        _ => None,
    })
}

async fn submit(api: Arc<HttpLeadApi>, config: &ClientConfig, submission: Submission) -> Result<(), CliError> {
    let confirmation = SubmissionClient::new(api, config).submit(submission).await?;
    println!("{}", confirmation.message);
    println!("id: {}", confirmation.id);
    Ok(())
}

async fn run_admin(api: &impl LeadApi, admin: AdminCommand) -> Result<(), CliError> {
    match admin.command {
        AdminSubcommand::List { status, page } => print_json(&api.get_inquiries(status, &page_query(page)).await?),
        AdminSubcommand::Samples { page } => print_json(&api.get_sample_requests(&page_query(page)).await?),
        AdminSubcommand::Analytics => print_json(&api.get_analytics().await?),
        AdminSubcommand::SetStatus { id, status } => print_json(&api.update_inquiry_status(id, status).await?),
    }
}

fn inquiry_submission(args: InquiryArgs) -> InquirySubmission {
    let contact = args.contact;
    InquirySubmission {
        first_name: contact.first_name,
        last_name: contact.last_name,
        company: contact.company,
        email: contact.email,
        phone: contact.phone,
        country: contact.country,
        interest: args.interest,
        message: args.message,
    }
}

fn sample_submission(args: SampleArgs) -> SampleRequestSubmission {
    let contact = args.contact;
    SampleRequestSubmission {
        first_name: contact.first_name,
        last_name: contact.last_name,
        company: contact.company,
        email: contact.email,
        phone: contact.phone,
        country: contact.country,
        tea_types: args.tea_types,
        quantities: args.quantities,
        notes: args.notes,
    }
}

fn page_query(page: PageArgs) -> PageQuery {
    PageQuery { page_size: page.page_size, cursor: page.cursor }
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
