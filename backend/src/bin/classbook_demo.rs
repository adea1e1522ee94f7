//! Run school pipelines against a generated example school.
//!
//! Settings come from `CLASSBOOK_*` environment variables. Each call is
//! dispatched to the blocking pool and its outcome printed as JSON.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use classbook::config::PipelineSettings;
use classbook::domain::ports::{AvailabilityGate, NameDirectory};
use classbook::domain::school::{
    Justification, JustificationFilter, JustificationStatus, MonitoringFilter, NoteFilter,
    PreferredSite, PreferredSiteFilter, RegisterFilter, ReportCardFilter, ReportStatisticsService,
    TeachingFilter, justification_commands, justifications_pipeline, monitoring_pipeline,
    notes_pipeline, preferred_site_commands, preferred_sites_pipeline,
    registers_by_class_pipeline, registers_pipeline, report_cards_pipeline,
    report_statistics_pipeline, teachings_pipeline,
};
use classbook::domain::{
    Gates, Mutation, PipelineResult, Principal, RecordId, RequestContext, SortOrder,
};
use classbook::example_data::{SchoolDataset, load_example_school, principal_for};
use classbook::inbound::{OutcomeView, PipelineDispatcher};
use classbook::outbound::{CapabilityAccessGate, FixedAvailabilityGate, FlakyAvailabilityGate};
use color_eyre::eyre::{Context, Result, eyre};
use example_data::{ExampleSchool, RoleSeed};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

/// `classbook-demo` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "classbook-demo",
    about = "Query and update a generated example school through gated pipelines",
    version
)]
struct CliArgs {
    /// Role whose first seeded member makes the request.
    #[arg(long = "as", value_enum, default_value_t = Role::Administrator)]
    role: Role,
    /// Disable simulated interruptions.
    #[arg(long)]
    reliable: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Role {
    Administrator,
    Teacher,
    Student,
    Parent,
}

impl From<Role> for RoleSeed {
    fn from(role: Role) -> Self {
        match role {
            Role::Administrator => Self::Administrator,
            Role::Teacher => Self::Teacher,
            Role::Student => Self::Student,
            Role::Parent => Self::Parent,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
struct Listing {
    /// Select one record by id instead of filtering.
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    offset: Option<usize>,
    #[arg(long)]
    limit: Option<usize>,
    /// Continue from a cursor returned by an earlier page.
    #[arg(long, conflicts_with = "offset")]
    cursor: Option<String>,
    /// `asc` or `desc`.
    #[arg(long)]
    sort: Option<SortOrder>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Class registers of an academic year.
    Registers {
        #[arg(long, default_value = "2023-2024")]
        year: String,
        /// Group by class instead of listing.
        #[arg(long)]
        by_class: bool,
        #[command(flatten)]
        listing: Listing,
    },
    /// Disciplinary notes of a student.
    Notes {
        /// Defaults to the first seeded student.
        #[arg(long)]
        student: Option<String>,
        #[command(flatten)]
        listing: Listing,
    },
    /// Teachings grouped by class.
    Teachings {
        #[arg(long, default_value = "2023-2024", conflicts_with = "teacher")]
        year: String,
        #[arg(long)]
        teacher: Option<String>,
    },
    /// Absence justifications.
    Justifications {
        #[command(subcommand)]
        action: JustificationAction,
    },
    /// Report cards of a semester.
    Reports {
        #[arg(long)]
        semester: Option<u8>,
        #[arg(long)]
        student: Option<String>,
        #[command(flatten)]
        listing: Listing,
    },
    /// Grade statistics of a semester.
    Statistics {
        #[arg(long)]
        semester: Option<u8>,
    },
    /// Students above an absence or note threshold.
    Monitoring {
        #[arg(long, default_value_t = 10)]
        absences: u32,
        #[arg(long, default_value_t = 3)]
        notes: u32,
        #[command(flatten)]
        listing: Listing,
    },
    /// The requester's preferred sites.
    Sites {
        #[command(subcommand)]
        action: SiteAction,
    },
}

#[derive(Debug, Subcommand)]
enum JustificationAction {
    /// List a student's justifications.
    List {
        #[arg(long)]
        student: Option<String>,
        #[command(flatten)]
        listing: Listing,
    },
    /// Record a pending justification.
    Add {
        #[arg(long)]
        student: Option<String>,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        reason: String,
    },
    /// Withdraw a justification.
    Withdraw {
        #[arg(long)]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum SiteAction {
    /// List sites grouped by city.
    List,
    /// Save a site.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        city: String,
    },
    /// Remove a saved site.
    Delete {
        #[arg(long)]
        id: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: CliArgs) -> Result<()> {
    let settings = PipelineSettings::load_from_iter([OsString::from("classbook")])
        .map_err(|err| eyre!("load settings: {err}"))?;
    settings.validate().wrap_err("invalid settings")?;

    let availability: Arc<dyn AvailabilityGate> = if args.reliable {
        Arc::new(FixedAvailabilityGate::up())
    } else {
        Arc::new(
            FlakyAvailabilityGate::new(settings.fault_probability(), settings.fault_seed)
                .wrap_err("build availability gate")?,
        )
    };
    let (school, dataset) = load_example_school(&settings, Arc::clone(&availability))
        .wrap_err("load example school")?;
    let principal = first_principal(&school, args.role.into())?;
    let demo = Demo {
        gates: Gates::new(availability, Arc::new(CapabilityAccessGate)),
        directory: dataset.directory.clone(),
        dispatcher: PipelineDispatcher::try_current()?,
        default_limit: settings.default_page_limit(),
        first_student: first_id(&school, RoleSeed::Student)?,
        principal,
        dataset,
    };
    demo.run(args.command).await
}

fn first_principal(school: &ExampleSchool, role: RoleSeed) -> Result<Principal> {
    let person = school
        .people_with_role(role)
        .next()
        .ok_or_else(|| eyre!("the example school has no {role:?}"))?;
    Ok(principal_for(person)?)
}

fn first_id(school: &ExampleSchool, role: RoleSeed) -> Result<String> {
    school
        .people_with_role(role)
        .next()
        .map(|person| person.id.to_string())
        .ok_or_else(|| eyre!("the example school has no {role:?}"))
}

fn new_record_id() -> Result<RecordId> {
    Ok(RecordId::new(Uuid::new_v4().to_string())?)
}

struct Demo {
    gates: Gates,
    directory: Arc<dyn NameDirectory>,
    dispatcher: PipelineDispatcher,
    default_limit: usize,
    first_student: String,
    principal: Principal,
    dataset: SchoolDataset,
}

impl Demo {
    fn request<F>(&self, filter: F, listing: Listing) -> RequestContext<F> {
        let principal = self.principal.clone();
        let mut request = match listing.id {
            Some(id) => RequestContext::by_id(principal, id),
            None => RequestContext::by_filter(principal, filter),
        };
        if let Some(cursor) = listing.cursor {
            request = request.with_cursor(cursor);
        } else if listing.offset.is_some() || listing.limit.is_some() {
            request = request.with_page(
                listing.offset.unwrap_or(0),
                listing.limit.unwrap_or(self.default_limit),
            );
        }
        if let Some(order) = listing.sort {
            request = request.with_sort(order);
        }
        request
    }

    async fn present<T, F>(&self, name: &'static str, job: F) -> Result<()>
    where
        T: Serialize + Send + 'static,
        F: FnOnce() -> PipelineResult<T> + Send + 'static,
    {
        let view = OutcomeView::from(self.dispatcher.dispatch(name, job).outcome().await);
        println!("{}", serde_json::to_string_pretty(&view)?);
        Ok(())
    }

    async fn run(self, command: Command) -> Result<()> {
        let gates = self.gates.clone();
        let directory = Arc::clone(&self.directory);
        match command {
            Command::Registers {
                year,
                by_class,
                listing,
            } => {
                let store = Arc::clone(&self.dataset.registers);
                let request = self.request(RegisterFilter::academic_year(year), listing);
                let pipeline = if by_class {
                    registers_by_class_pipeline(gates, store, directory)
                } else {
                    registers_pipeline(gates, store, directory)
                };
                self.present("registers", move || pipeline.execute(&request))
                    .await
            }
            Command::Notes { student, listing } => {
                let student = student.unwrap_or_else(|| self.first_student.clone());
                let request = self.request(NoteFilter::student(student), listing);
                let pipeline = notes_pipeline(gates, Arc::clone(&self.dataset.notes), directory);
                self.present("notes", move || pipeline.execute(&request)).await
            }
            Command::Teachings { year, teacher } => {
                let filter = match teacher {
                    Some(teacher) => TeachingFilter::Teacher(teacher),
                    None => TeachingFilter::AcademicYear(year),
                };
                let request = self.request(filter, Listing::default());
                let pipeline =
                    teachings_pipeline(gates, Arc::clone(&self.dataset.teachings), directory);
                self.present("teachings", move || pipeline.execute(&request))
                    .await
            }
            Command::Justifications { action } => self.justifications(action).await,
            Command::Reports {
                semester,
                student,
                listing,
            } => {
                let request = self.request(report_filter(semester, student), listing);
                let pipeline =
                    report_cards_pipeline(gates, Arc::clone(&self.dataset.report_cards), directory);
                self.present("report_cards", move || pipeline.execute(&request))
                    .await
            }
            Command::Statistics { semester } => {
                let request = self.request(report_filter(semester, None), Listing::default());
                let service = ReportStatisticsService::new(
                    report_statistics_pipeline(
                        gates,
                        Arc::clone(&self.dataset.report_cards),
                        directory,
                    ),
                    Arc::new(DefaultClock),
                );
                self.present("report_statistics", move || service.generate(&request))
                    .await
            }
            Command::Monitoring {
                absences,
                notes,
                listing,
            } => {
                let request = self.request(MonitoringFilter::new(absences, notes), listing);
                let pipeline =
                    monitoring_pipeline(gates, Arc::clone(&self.dataset.attendance), directory);
                self.present("student_monitoring", move || pipeline.execute(&request))
                    .await
            }
            Command::Sites { action } => self.sites(action).await,
        }
    }

    async fn justifications(self, action: JustificationAction) -> Result<()> {
        let gates = self.gates.clone();
        let store = Arc::clone(&self.dataset.justifications);
        let directory = Arc::clone(&self.directory);
        match action {
            JustificationAction::List { student, listing } => {
                let student = student.unwrap_or_else(|| self.first_student.clone());
                let request = self.request(JustificationFilter::student(student), listing);
                let pipeline = justifications_pipeline(gates, store, directory);
                self.present("justifications", move || pipeline.execute(&request))
                    .await
            }
            JustificationAction::Add {
                student,
                date,
                reason,
            } => {
                let justification = Justification {
                    id: new_record_id()?,
                    student_id: student.unwrap_or_else(|| self.first_student.clone()),
                    absence_date: date,
                    reason,
                    status: JustificationStatus::Pending,
                    internal_reviewer: None,
                    updated_at: None,
                };
                let commands =
                    justification_commands(gates, store, directory, Arc::new(DefaultClock));
                let principal = self.principal.clone();
                self.present("justification_writes", move || {
                    commands.execute(&principal, Mutation::Insert(justification))
                })
                .await
            }
            JustificationAction::Withdraw { id } => {
                let commands =
                    justification_commands(gates, store, directory, Arc::new(DefaultClock));
                let principal = self.principal.clone();
                self.present("justification_writes", move || {
                    commands.execute(&principal, Mutation::Delete(id))
                })
                .await
            }
        }
    }

    async fn sites(self, action: SiteAction) -> Result<()> {
        let gates = self.gates.clone();
        let store = Arc::clone(&self.dataset.preferred_sites);
        let principal = self.principal.clone();
        match action {
            SiteAction::List => {
                let request = self.request(
                    PreferredSiteFilter::owner(principal.id().to_string()),
                    Listing::default(),
                );
                let pipeline = preferred_sites_pipeline(gates, store);
                self.present("preferred_sites", move || pipeline.execute(&request))
                    .await
            }
            SiteAction::Add { name, city } => {
                let site = PreferredSite {
                    id: new_record_id()?,
                    owner_id: principal.id().to_string(),
                    site_name: name,
                    city,
                };
                let commands = preferred_site_commands(gates, store, Arc::new(DefaultClock));
                self.present("preferred_site_writes", move || {
                    commands.execute(&principal, Mutation::Insert(site))
                })
                .await
            }
            SiteAction::Delete { id } => {
                let commands = preferred_site_commands(gates, store, Arc::new(DefaultClock));
                self.present("preferred_site_writes", move || {
                    commands.execute(&principal, Mutation::Delete(id))
                })
                .await
            }
        }
    }
}

fn report_filter(semester: Option<u8>, student: Option<String>) -> ReportCardFilter {
    let filter = ReportCardFilter::all();
    let filter = match semester {
        Some(semester) => filter.semester(semester),
        None => filter,
    };
    match student {
        Some(student) => filter.student(student),
        None => filter,
    }
}
