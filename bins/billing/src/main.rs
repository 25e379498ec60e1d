//! Madrasah billing CLI
//!
//! Generates fee invoices, allocates person identifiers and prints Quran
//! tracking metrics. Run `billing --help` for the subcommands.

use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use madrasah_core::clock::{Clock, SystemClock};
use madrasah_core::invoice::{
    GenerateInvoiceInput, GenerateInvoiceOptions, InvoiceGenerator, PaymentPlan,
};
use madrasah_core::numbering::{IdentifierKind, NumberingService};
use madrasah_core::quran::{
    QuranApiClient, QuranContentSource, QuranTrackingCalculator, StaticContentSource,
    TrackingRange, validate_page_range, validate_verse_range,
};
use madrasah_db::{IdentifierRepository, InvoiceRepository, connect_with_config};
use sea_orm::DatabaseConnection;
use madrasah_shared::{
    AcademicTermId, AppConfig, GuardianId, QuranApiConfig, TenantId, UserId,
};

#[derive(Parser, Debug)]
#[command(name = "billing", version, about = "Madrasah fee billing and Quran tracking")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Generate the term invoice for one guardian
    Invoice {
        tenant_id: TenantId,
        guardian_id: GuardianId,
        term_id: AcademicTermId,
        /// User recorded as the invoice author
        user_id: UserId,
        #[arg(value_enum, default_value_t = PlanArg::Full)]
        plan: PlanArg,
    },
    /// Generate invoices for every active guardian in a term
    Term {
        tenant_id: TenantId,
        term_id: AcademicTermId,
        user_id: UserId,
        #[arg(value_enum, default_value_t = PlanArg::Full)]
        plan: PlanArg,
    },
    /// Print the next free student, guardian or employee number
    #[command(name = "next-id")]
    NextId {
        tenant_id: TenantId,
        #[arg(value_enum)]
        kind: KindArg,
    },
    /// Compute memorization metrics for a verse range
    Quran {
        surah_from: u32,
        verse_from: u32,
        surah_to: u32,
        verse_to: u32,
        /// First mushaf page, if recorded
        #[arg(requires = "page_to")]
        page_from: Option<u32>,
        /// Last mushaf page, if recorded
        page_to: Option<u32>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum PlanArg {
    Full,
    #[value(alias = "half_half")]
    HalfHalf,
    Monthly,
}

impl From<PlanArg> for PaymentPlan {
    fn from(plan: PlanArg) -> Self {
        match plan {
            PlanArg::Full => Self::Full,
            PlanArg::HalfHalf => Self::HalfHalf,
            PlanArg::Monthly => Self::Monthly,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum KindArg {
    Student,
    #[value(alias = "parent")]
    Guardian,
    Employee,
}

impl From<KindArg> for IdentifierKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Student => Self::Student,
            KindArg::Guardian => Self::Guardian,
            KindArg::Employee => Self::Employee,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "madrasah=debug,sea_orm=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match Cli::parse().command {
        Command::Invoice {
            tenant_id,
            guardian_id,
            term_id,
            user_id,
            plan,
        } => {
            let (config, db) = connect().await?;
            let repo = InvoiceRepository::new(db);
            let term = repo
                .find_term(tenant_id, term_id)
                .await?
                .with_context(|| format!("Academic term {term_id} not found"))?;
            let generator =
                InvoiceGenerator::new(Arc::new(repo), Arc::new(SystemClock), &config.numbering);

            let generated = generator
                .generate_for_guardian(&GenerateInvoiceInput {
                    tenant_id,
                    guardian_id,
                    term,
                    generated_by: user_id,
                    payment_plan: plan.into(),
                    options: GenerateInvoiceOptions::default(),
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&generated)?);
        }
        Command::Term {
            tenant_id,
            term_id,
            user_id,
            plan,
        } => {
            let (config, db) = connect().await?;
            let repo = InvoiceRepository::new(db);
            let term = repo
                .find_term(tenant_id, term_id)
                .await?
                .with_context(|| format!("Academic term {term_id} not found"))?;
            let generator =
                InvoiceGenerator::new(Arc::new(repo), Arc::new(SystemClock), &config.numbering);

            let report = generator
                .generate_for_term(
                    tenant_id,
                    &term,
                    user_id,
                    plan.into(),
                    &GenerateInvoiceOptions::default(),
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::NextId { tenant_id, kind } => {
            let (config, db) = connect().await?;
            let numbering =
                NumberingService::new(Arc::new(IdentifierRepository::new(db)), &config.numbering);
            let identifier = numbering
                .generate(tenant_id, kind.into(), SystemClock.today())
                .await?;
            println!("{identifier}");
        }
        Command::Quran {
            surah_from,
            verse_from,
            surah_to,
            verse_to,
            page_from,
            page_to,
        } => {
            let range = TrackingRange {
                surah_from,
                verse_from,
                surah_to,
                verse_to,
                page_from,
                page_to,
            };
            // Metrics work offline; a missing database setting is not fatal here.
            let quran_api = AppConfig::load()
                .map(|config| config.quran_api)
                .unwrap_or_default();
            quran_metrics(quran_api, &range).await?;
        }
    }

    Ok(())
}

async fn connect() -> anyhow::Result<(AppConfig, DatabaseConnection)> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    let db = connect_with_config(&config.database).await?;
    info!("Connected to database");
    Ok((config, db))
}

async fn quran_metrics(config: QuranApiConfig, range: &TrackingRange) -> anyhow::Result<()> {
    let verses = validate_verse_range(
        range.surah_from,
        range.verse_from,
        range.surah_to,
        range.verse_to,
    );
    if !verses.valid {
        bail!(verses.error.unwrap_or_default());
    }
    if let (Some(from), Some(to)) = (range.page_from, range.page_to) {
        let pages = validate_page_range(from, to);
        if !pages.valid {
            bail!(pages.error.unwrap_or_default());
        }
    }

    if config.has_credentials() {
        let client = QuranApiClient::new(config)?;
        print_metrics(client, range).await
    } else {
        info!("Quran API credentials not configured, using offline lookups");
        print_metrics(StaticContentSource, range).await
    }
}

async fn print_metrics<S: QuranContentSource>(
    source: S,
    range: &TrackingRange,
) -> anyhow::Result<()> {
    let calculator = QuranTrackingCalculator::new(Arc::new(source));
    let metrics = calculator.compute_all_metrics(range).await;
    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(line: &str) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("billing").chain(line.split_whitespace()))
            .map(|cli| cli.command)
    }

    #[test]
    fn test_parse_invoice_with_default_plan() {
        let tenant = TenantId::new();
        let guardian = GuardianId::new();
        let term = AcademicTermId::new();
        let user = UserId::new();

        let command = parse(&format!("invoice {tenant} {guardian} {term} {user}")).unwrap();

        assert_eq!(
            command,
            Command::Invoice {
                tenant_id: tenant,
                guardian_id: guardian,
                term_id: term,
                user_id: user,
                plan: PlanArg::Full,
            }
        );
        assert_eq!(PaymentPlan::from(PlanArg::Full), PaymentPlan::Full);
    }

    #[test]
    fn test_parse_term_with_plan() {
        let tenant = TenantId::new();
        let term = AcademicTermId::new();
        let user = UserId::new();

        let command = parse(&format!("term {tenant} {term} {user} monthly")).unwrap();
        assert!(matches!(
            command,
            Command::Term {
                plan: PlanArg::Monthly,
                ..
            }
        ));

        for spelling in ["half-half", "half_half"] {
            let command = parse(&format!("term {tenant} {term} {user} {spelling}")).unwrap();
            let Command::Term { plan, .. } = command else {
                panic!("expected term command");
            };
            assert_eq!(PaymentPlan::from(plan), PaymentPlan::HalfHalf);
        }
    }

    #[test]
    fn test_parse_next_id_kind() {
        let tenant = TenantId::new();
        let command = parse(&format!("next-id {tenant} parent")).unwrap();

        assert_eq!(
            command,
            Command::NextId {
                tenant_id: tenant,
                kind: KindArg::Guardian,
            }
        );
        assert_eq!(IdentifierKind::from(KindArg::Guardian), IdentifierKind::Guardian);
    }

    #[test]
    fn test_parse_quran_pages_are_optional() {
        let Command::Quran { page_from, .. } = parse("quran 2 10 2 5").unwrap() else {
            panic!("expected quran command");
        };
        assert_eq!(page_from, None);

        let Command::Quran {
            page_from, page_to, ..
        } = parse("quran 1 1 2 141 1 22").unwrap()
        else {
            panic!("expected quran command");
        };
        assert_eq!((page_from, page_to), (Some(1), Some(22)));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse("").is_err());
        assert_eq!(
            parse("quran 1 1 2 141 7").unwrap_err().kind(),
            ErrorKind::MissingRequiredArgument
        );
        assert_eq!(
            parse("next-id not-a-uuid student").unwrap_err().kind(),
            ErrorKind::ValueValidation
        );
        assert_eq!(
            parse(&format!("next-id {} teacher", TenantId::new()))
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidValue
        );
        assert!(parse("refund").is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
