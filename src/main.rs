use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use change_makers::config::AppConfig;
use change_makers::error::AppError;
use change_makers::incentives::{
    base_bonus, incentive_router, total_bonus, ComplianceChecklist, DashboardView,
    HistoryImportReport, HistoryImporter, IncentiveService, InMemoryBadgeRepository,
    InMemoryPerformanceRepository, InMemoryTechnicianRepository, SubmissionOutcome, Technician,
    WeekKey, WeeklySubmission,
};
use change_makers::telemetry;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

type AppService = IncentiveService<
    InMemoryTechnicianRepository,
    InMemoryPerformanceRepository,
    InMemoryBadgeRepository,
>;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Change Makers",
    about = "Track weekly technician performance, bonus payouts, and badges from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Price a week of figures against the bonus plan
    Preview(PreviewArgs),
    /// Run the weekly flow end to end against an in-memory store
    Demo(DemoArgs),
    /// Import a CSV history export for a freshly enrolled technician
    Backfill(BackfillArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Weekly revenue to price (prints the payout table when omitted)
    #[arg(long)]
    revenue: Option<f64>,
    /// Five-star reviews for the week
    #[arg(long, default_value_t = 0)]
    reviews: u32,
    /// Memberships sold for the week
    #[arg(long, default_value_t = 0)]
    memberships: u32,
    /// Price the week as having failed its compliance checklist
    #[arg(long)]
    non_compliant: bool,
}

#[derive(Args, Debug, Default)]
struct DemoArgs {
    /// Week the showcase submission lands on (defaults to the current week)
    #[arg(long, value_parser = parse_week)]
    week: Option<WeekKey>,
}

#[derive(Args, Debug)]
struct BackfillArgs {
    /// Display name for the technician to enroll
    #[arg(long, default_value = "Marshall Snider")]
    name: String,
    /// CSV export with one row per historical week
    #[arg(long)]
    csv: PathBuf,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Preview(args) => run_preview(args),
        Command::Demo(args) => run_demo(args),
        Command::Backfill(args) => run_backfill(args),
    }
}

fn parse_week(raw: &str) -> Result<WeekKey, String> {
    raw.trim().parse::<WeekKey>().map_err(|err| err.to_string())
}

fn build_service() -> AppService {
    IncentiveService::new(
        Arc::new(InMemoryTechnicianRepository::default()),
        Arc::new(InMemoryPerformanceRepository::default()),
        Arc::new(InMemoryBadgeRepository::default()),
    )
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let service = Arc::new(build_service());
    service.seed_badge_catalog()?;
    if config.seed_demo_data {
        seed_demo_data(&service)?;
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let ops = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state);

    let app = incentive_router(service).merge(ops).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "weekly incentive service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn seed_demo_data(service: &AppService) -> Result<(), AppError> {
    let technician = service.enroll_technician("Marshall Snider")?;
    let submission = WeeklySubmission {
        technician_id: technician.id.clone(),
        week: WeekKey::current().previous(),
        total_revenue: 5_000.0,
        jobs_completed: 10,
        five_star_reviews: 2,
        memberships_sold: 1,
        compliance: ComplianceChecklist::all_passing(),
    };
    service.submit_week(submission)?;
    info!(technician = %technician.id, "demo roster seeded");
    Ok(())
}

fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    match args.revenue {
        Some(revenue) => {
            let breakdown =
                total_bonus(revenue, args.reviews, args.memberships, !args.non_compliant);
            let footing = if args.non_compliant {
                "checklist failed"
            } else {
                "fully compliant"
            };
            println!(
                "Payout for ${revenue:.2} with {} reviews and {} memberships ({footing})",
                args.reviews, args.memberships
            );
            println!("- base:  ${:.2}", breakdown.base);
            println!("- spifs: ${:.2}", breakdown.spifs);
            println!("- total: ${:.2}", breakdown.total);
        }
        None => render_payout_table(),
    }
    Ok(())
}

fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = build_service();
    service.seed_badge_catalog()?;
    let technician = service.enroll_technician("Marshall Snider")?;

    let final_week = args.week.unwrap_or_else(WeekKey::current);
    let mut warmups = Vec::new();
    let mut cursor = final_week;
    for _ in 0..4 {
        cursor = cursor.previous();
        warmups.push(cursor);
    }
    warmups.reverse();

    println!("Weekly incentive demo");
    println!("Technician: {} ({})", technician.name, technician.id);

    for week in warmups {
        let outcome = service.submit_week(WeeklySubmission {
            technician_id: technician.id.clone(),
            week,
            total_revenue: 5_000.0,
            jobs_completed: 10,
            five_star_reviews: 2,
            memberships_sold: 1,
            compliance: ComplianceChecklist::all_passing(),
        })?;
        println!("- {} recorded, streak {}", week, outcome.streak);
    }

    let outcome = service.submit_week(WeeklySubmission {
        technician_id: technician.id.clone(),
        week: final_week,
        total_revenue: 13_500.0,
        jobs_completed: 10,
        five_star_reviews: 5,
        memberships_sold: 2,
        compliance: ComplianceChecklist::all_passing(),
    })?;
    render_submission_outcome(&outcome);

    let dashboard = service.week_dashboard(&technician.id, Some(final_week))?;
    render_dashboard(&dashboard);

    Ok(())
}

fn run_backfill(args: BackfillArgs) -> Result<(), AppError> {
    let service = build_service();
    service.seed_badge_catalog()?;
    let technician = service.enroll_technician(&args.name)?;

    let importer = HistoryImporter::new(&service, technician.id.clone());
    let report = importer.from_path(&args.csv)?;
    render_import_report(&technician, &report);

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn render_payout_table() {
    println!("Base bonus by weekly revenue (fully compliant week)");
    for revenue in [
        6_500.0, 7_000.0, 8_000.0, 9_000.0, 10_000.0, 11_000.0, 12_000.0, 13_000.0, 15_000.0,
        20_000.0,
    ] {
        println!("- ${:>9.2} -> ${:>8.2}", revenue, base_bonus(revenue));
    }
    println!("Spifs: $25.00 per five-star review and per membership sold");
}

fn render_submission_outcome(outcome: &SubmissionOutcome) {
    let record = &outcome.record;
    println!("\n{} submitted", record.week);
    println!(
        "- revenue ${:.2} over {} jobs, {} reviews, {} memberships",
        record.total_revenue,
        record.jobs_completed,
        record.five_star_reviews,
        record.memberships_sold
    );
    if record.bonus.eligible {
        println!(
            "- bonus: base ${:.2} + spifs ${:.2} = ${:.2}",
            record.bonus.base, record.bonus.spifs, record.bonus.total
        );
    } else {
        println!("- bonus withheld: week not fully compliant");
    }
    println!("- compliance streak: {}", outcome.streak);
    if outcome.awarded.is_empty() {
        println!("- new badges: none");
    } else {
        println!("- new badges");
        for badge in &outcome.awarded {
            println!("  - {}: {}", badge.name, badge.description);
        }
    }
}

fn render_dashboard(view: &DashboardView) {
    println!("\nDashboard for {} ({})", view.technician.name, view.week);
    println!(
        "- bonus floor progress: {:.0}%",
        view.bonus_floor_progress * 100.0
    );
    println!(
        "- goal progress: {:.0}% of ${:.2}",
        view.goal_progress * 100.0,
        view.record.revenue_goal
    );
    println!("- average ticket: ${:.2}", view.average_ticket);
    println!("- projected payout: ${:.2}", view.bonus.total);
    let failing: Vec<_> = view
        .compliance
        .iter()
        .filter(|status| !status.passed)
        .map(|status| status.label)
        .collect();
    if failing.is_empty() {
        println!("- compliance: all items passing");
    } else {
        println!("- compliance alerts: {}", failing.join(", "));
    }
    if let Some(previous) = &view.previous {
        println!(
            "- last week ({}): ${:.2} over {} jobs, payout ${:.2}",
            previous.week, previous.total_revenue, previous.jobs_completed, previous.bonus.total
        );
    }
    println!("- badges");
    for standing in &view.badges {
        let marker = if standing.earned { "x" } else { " " };
        println!("  [{}] {} - {}", marker, standing.spec.name, standing.spec.description);
    }
}

fn render_import_report(technician: &Technician, report: &HistoryImportReport) {
    println!("History import for {} ({})", technician.name, technician.id);
    println!("- weeks applied: {}", report.weeks_applied);
    if report.duplicates_ignored > 0 {
        println!("- duplicate rows ignored: {}", report.duplicates_ignored);
    }
    if let (Some(first), Some(last)) = (report.first_week, report.last_week) {
        println!("- range: {first} -> {last}");
    }
    println!("- final streak: {}", report.final_streak);
    if report.badges_awarded.is_empty() {
        println!("- badges awarded: none");
    } else {
        println!("- badges awarded");
        for badge in &report.badges_awarded {
            println!("  - {}: {}", badge.name, badge.description);
        }
    }
}
