use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tabled::{settings::Style, Table, Tabled};

use extratos::aggregate::BreakdownSlice;
use extratos::api::{ApiClient, BatchStatus, PdfUpload};
use extratos::config::{
    config_dir, config_file, load_config, resolve_base_url, Config, UrlSource, API_URL_ENV,
    CONFIG_TEMPLATE,
};
use extratos::dashboard::{Dashboard, DashboardData, DashboardOptions, QueryCache, Source};
use extratos::error::{ExtratoError, Result};
use extratos::model::{DashboardFilters, StatementFilters, WorkRecord};
use extratos::period::{Preset, PeriodSelector};

#[derive(Parser)]
#[command(name = "extratos")]
#[command(version, about = "Port worker payroll statements client and dashboard", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Base URL of the statements API (overrides EXTRATOS_API_URL and config.toml)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a config.toml template
    Init,

    /// Show the effective configuration
    Status,

    /// List statements
    List {
        #[command(flatten)]
        filters: ListFilters,
    },

    /// Show one statement with its jobs
    Show {
        /// Statement id
        id: String,
    },

    /// Upload statement PDFs for processing
    Upload {
        /// PDF files (max 10 MiB each)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Server roll-up for one month
    Summary {
        /// Month code (JAN..DEZ)
        #[arg(long)]
        mes: String,

        #[arg(long)]
        ano: String,
    },

    /// List every job worked for an operator (tomador)
    Operator {
        /// Operator id
        id: String,
    },

    /// List the periods present in the statements
    Periods {
        #[command(flatten)]
        filters: ListFilters,
    },

    /// Show dashboard analytics for a period
    Dashboard {
        /// Preset period (this-month, last-30-days, last-3-months, ...)
        #[arg(long, conflicts_with_all = ["mes", "ano", "from", "to"])]
        preset: Option<Preset>,

        /// Statement month code (JAN..DEZ)
        #[arg(long)]
        mes: Option<String>,

        /// Statement year
        #[arg(long)]
        ano: Option<String>,

        /// Custom range start (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Custom range end (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Professional category
        #[arg(long)]
        categoria: Option<String>,

        /// Skip the server analytics endpoints and aggregate locally
        #[arg(long)]
        local: bool,

        /// Number of top jobs to show
        #[arg(long, default_value_t = extratos::dashboard::TOP_JOBS_LIMIT)]
        top: usize,
    },
}

#[derive(Args)]
struct ListFilters {
    #[arg(long)]
    matricula: Option<String>,
    #[arg(long)]
    nome: Option<String>,
    /// Month code (JAN..DEZ)
    #[arg(long)]
    mes: Option<String>,
    #[arg(long)]
    ano: Option<String>,
    #[arg(long)]
    categoria: Option<String>,
    /// Operator (tomador) id
    #[arg(long)]
    tomador: Option<String>,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    data_inicio: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    data_fim: Option<String>,
}

impl ListFilters {
    fn into_filters(self) -> Result<StatementFilters> {
        Ok(StatementFilters {
            registration: self.matricula,
            name: self.nome,
            month: self.mes,
            year: self.ano,
            category: self.categoria,
            operator: self.tomador,
            date_start: self.data_inicio.map(|d| check_date(&d)).transpose()?,
            date_end: self.data_fim.map(|d| check_date(&d)).transpose()?,
        })
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ExtratoError::InvalidDate(s.to_string()))
}

fn check_date(s: &str) -> Result<String> {
    parse_date(s).map(|d| d.format("%Y-%m-%d").to_string())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };
    let api_url = cli.api_url.as_deref();

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir, api_url),
        Commands::List { filters } => cmd_list(&cfg_dir, api_url, filters.into_filters()?),
        Commands::Show { id } => cmd_show(&cfg_dir, api_url, &id),
        Commands::Upload { files } => cmd_upload(&cfg_dir, api_url, &files),
        Commands::Summary { mes, ano } => cmd_summary(&cfg_dir, api_url, &mes, &ano),
        Commands::Operator { id } => cmd_operator(&cfg_dir, api_url, &id),
        Commands::Periods { filters } => cmd_periods(&cfg_dir, api_url, filters.into_filters()?),
        Commands::Dashboard {
            preset,
            mes,
            ano,
            from,
            to,
            categoria,
            local,
            top,
        } => {
            let mut filters = match (preset, from, to) {
                (Some(preset), _, _) => preset.range_from_now().to_filters(),
                (None, Some(from), Some(to)) => {
                    let mut selector = PeriodSelector::new(chrono::Local::now().date_naive());
                    selector.open();
                    match selector.complete_range(parse_date(&from)?, parse_date(&to)?)? {
                        Some(range) => range.to_filters(),
                        None => selector.range().to_filters(),
                    }
                }
                _ => DashboardFilters {
                    month: mes.map(|m| m.to_uppercase()),
                    year: ano,
                    ..Default::default()
                },
            };
            filters.category = categoria;
            let options = DashboardOptions {
                server_analytics: !local,
                top_jobs_limit: top,
            };
            cmd_dashboard(&cfg_dir, api_url, &filters, options)
        }
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(ExtratoError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::write(config_file(cfg_dir), CONFIG_TEMPLATE)?;

    println!("Initialized extratos config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point it at your API:  $EDITOR {}",
        config_file(cfg_dir).display()
    );
    println!("  2. Upload statements:     extratos upload <file.pdf>");
    println!("  3. Open the dashboard:    extratos dashboard --preset this-month");

    Ok(())
}

struct Context {
    config: Config,
    config_present: bool,
    base_url: String,
    source: UrlSource,
}

fn context(cfg_dir: &Path, api_url: Option<&str>) -> Result<Context> {
    let config_present = config_file(cfg_dir).exists();
    let config = load_config(cfg_dir)?;
    let (base_url, source) = resolve_base_url(
        api_url,
        std::env::var(API_URL_ENV).ok(),
        &config,
        config_present,
    );
    log::debug!("using API at {base_url} (from {source})");
    Ok(Context {
        config,
        config_present,
        base_url,
        source,
    })
}

fn client(cfg_dir: &Path, api_url: Option<&str>) -> Result<ApiClient> {
    let ctx = context(cfg_dir, api_url)?;
    Ok(ApiClient::http(&ctx.base_url, &ctx.config.api))
}

fn dashboard(cfg_dir: &Path, api_url: Option<&str>, options: DashboardOptions) -> Result<Dashboard> {
    Ok(Dashboard::with_options(
        client(cfg_dir, api_url)?,
        Arc::new(QueryCache::new()),
        options,
    ))
}

/// Show the effective configuration
fn cmd_status(cfg_dir: &Path, api_url: Option<&str>) -> Result<()> {
    let ctx = context(cfg_dir, api_url)?;

    println!("Extratos Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    if ctx.config_present {
        println!("Config file:      {}", config_file(cfg_dir).display());
    } else {
        println!(
            "Config file:      {} (not found, using defaults)",
            config_file(cfg_dir).display()
        );
    }
    println!("API base URL:     {} ({})", ctx.base_url, ctx.source);
    println!("Timeout:          {}s", ctx.config.api.timeout_secs);
    println!("Retry attempts:   {}", ctx.config.api.retry_attempts);

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct StatementRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "MATRICULA")]
    registration: String,
    #[tabled(rename = "NOME")]
    name: String,
    #[tabled(rename = "PERIODO")]
    period: String,
    #[tabled(rename = "CATEGORIA")]
    category: String,
    #[tabled(rename = "FAINAS")]
    jobs: u32,
    #[tabled(rename = "VALOR")]
    total: String,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "CATEGORIA")]
    category: String,
    #[tabled(rename = "EXTRATOS")]
    count: u32,
    #[tabled(rename = "VALOR")]
    total: String,
}

#[derive(Tabled)]
struct JobRow {
    #[tabled(rename = "DIA")]
    day: String,
    #[tabled(rename = "PAGTO")]
    payment_period: String,
    #[tabled(rename = "TOMADOR")]
    operator: String,
    #[tabled(rename = "PASTA")]
    vessel: String,
    #[tabled(rename = "FUN")]
    function: String,
    #[tabled(rename = "TUR")]
    shift: String,
    #[tabled(rename = "BRUTO")]
    gross: String,
    #[tabled(rename = "LIQUIDO")]
    net: String,
}

#[derive(Tabled)]
struct PeriodRow {
    #[tabled(rename = "PERIODO")]
    label: String,
    #[tabled(rename = "MES")]
    month: String,
    #[tabled(rename = "ANO")]
    year: String,
}

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "MES")]
    name: String,
    #[tabled(rename = "FAINAS")]
    jobs: u32,
    #[tabled(rename = "VALOR")]
    total: String,
    #[tabled(rename = "MEDIA")]
    average: String,
}

#[derive(Tabled)]
struct OperatorRow {
    #[tabled(rename = "TOMADOR")]
    operator: String,
    #[tabled(rename = "FAINAS")]
    jobs: u32,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "MAIOR BRUTO")]
    max_gross: String,
    #[tabled(rename = "MEDIA")]
    average: String,
    #[tabled(rename = "%")]
    percentage: String,
}

#[derive(Tabled)]
struct NamedValueRow {
    #[tabled(rename = "NOME")]
    name: String,
    #[tabled(rename = "VALOR")]
    value: String,
}

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "NOME")]
    name: String,
    #[tabled(rename = "FAINAS")]
    count: u32,
    #[tabled(rename = "%")]
    percentage: String,
}

#[derive(Tabled)]
struct FunctionRow {
    #[tabled(rename = "FUNCAO")]
    name: String,
    #[tabled(rename = "FAINAS")]
    count: u32,
    #[tabled(rename = "BRUTO")]
    gross: String,
    #[tabled(rename = "MEDIA BRUTO")]
    average_gross: String,
    #[tabled(rename = "MEDIA LIQUIDO")]
    average_net: String,
}

#[derive(Tabled)]
struct UploadRow {
    #[tabled(rename = "ARQUIVO")]
    file: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "DETALHE")]
    detail: String,
}

/// Brazilian currency: `R$ 1.234,56`
fn format_money(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let negative = cents < 0;
    let cents = cents.unsigned_abs();
    let grouped = format_grouped_int(cents / 100);
    format!(
        "{}R$ {},{:02}",
        if negative { "-" } else { "" },
        grouped,
        cents % 100
    )
}

fn format_grouped_int(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

fn job_row(r: &WorkRecord) -> JobRow {
    JobRow {
        day: r.day.clone(),
        payment_period: r.payment_period.clone(),
        operator: r.operator_label().to_string(),
        vessel: r.vessel.clone(),
        function: r.function.clone(),
        shift: r.shift.clone(),
        gross: format_money(r.values.gross),
        net: format_money(r.values.net),
    }
}

fn print_table<T: Tabled>(title: &str, rows: Vec<T>) {
    println!("{title}");
    if rows.is_empty() {
        println!("  (no data)");
    } else {
        println!("{}", Table::new(rows).with(Style::rounded()));
    }
    println!();
}

/// List statements matching the filters
fn cmd_list(cfg_dir: &Path, api_url: Option<&str>, filters: StatementFilters) -> Result<()> {
    let dashboard = dashboard(cfg_dir, api_url, DashboardOptions::default())?;
    let listing = dashboard.listing(&filters)?;

    if listing.statements.is_empty() {
        println!("No statements found.");
        println!("Upload one with: extratos upload <file.pdf>");
        return Ok(());
    }

    let rows: Vec<StatementRow> = listing
        .statements
        .iter()
        .map(|s| StatementRow {
            id: s.id.clone(),
            registration: s.registration.clone(),
            name: s.name.clone(),
            period: format!("{}/{}", s.month, s.year),
            category: s.category.clone(),
            jobs: s.job_count,
            total: format_money(s.total_value),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    println!();

    let rows: Vec<CategoryRow> = listing
        .category_totals
        .iter()
        .map(|c| CategoryRow {
            category: c.category.clone(),
            count: c.count,
            total: format_money(c.total_value),
        })
        .collect();
    print_table("By category", rows);

    Ok(())
}

/// Show a statement and its jobs
fn cmd_show(cfg_dir: &Path, api_url: Option<&str>, id: &str) -> Result<()> {
    let dashboard = dashboard(cfg_dir, api_url, DashboardOptions::default())?;
    let statement = dashboard.statement(id)?;

    println!("Extrato {}", statement.id);
    println!("{}", "-".repeat(50));
    println!("Nome:       {}", statement.name);
    println!("Matricula:  {}", statement.registration);
    println!("Periodo:    {}/{}", statement.month, statement.year);
    println!("Categoria:  {}", statement.category);
    println!("Fainas:     {}", statement.records.len());
    println!();

    let rows: Vec<JobRow> = statement.records.iter().map(job_row).collect();
    print_table("Fainas", rows);

    let gross: f64 = statement.records.iter().map(|r| r.values.gross).sum();
    let net: f64 = statement.records.iter().map(|r| r.values.net).sum();
    println!("Total bruto:   {}", format_money(gross));
    println!("Total liquido: {}", format_money(net));

    Ok(())
}

/// Upload statement PDFs, one request per file
fn cmd_upload(cfg_dir: &Path, api_url: Option<&str>, files: &[PathBuf]) -> Result<()> {
    // Every file is checked before anything goes over the network.
    let uploads = files
        .iter()
        .map(|path| PdfUpload::from_path(path))
        .collect::<Result<Vec<_>>>()?;

    let dashboard = dashboard(cfg_dir, api_url, DashboardOptions::default())?;
    let report = dashboard.upload(&uploads);

    let rows: Vec<UploadRow> = report
        .outcomes
        .iter()
        .map(|o| match &o.result {
            Ok(response) => UploadRow {
                file: o.file_name.clone(),
                status: format!("{:?}", response.status).to_lowercase(),
                detail: format!(
                    "{} {}/{} (id {})",
                    response.name, response.month, response.year, response.id
                ),
            },
            Err(e) => UploadRow {
                file: o.file_name.clone(),
                status: "error".to_string(),
                detail: e.to_string(),
            },
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));

    match report.status() {
        BatchStatus::AllSucceeded => {
            println!("Uploaded {} file(s).", report.succeeded());
            Ok(())
        }
        BatchStatus::Partial => {
            println!(
                "Uploaded {} of {} file(s); {} failed.",
                report.succeeded(),
                report.outcomes.len(),
                report.failed()
            );
            Ok(())
        }
        BatchStatus::AllFailed => Err(ExtratoError::Rejected {
            message: format!("all {} upload(s) failed", report.failed()),
        }),
    }
}

/// Show the server's monthly roll-up
fn cmd_summary(cfg_dir: &Path, api_url: Option<&str>, mes: &str, ano: &str) -> Result<()> {
    let summary = client(cfg_dir, api_url)?.monthly_summary(&mes.to_uppercase(), ano)?;

    println!("Resumo {}/{}", summary.period.month, summary.period.year);
    println!("{}", "-".repeat(50));
    println!("Trabalhadores:  {}", summary.total_workers);
    println!("Fainas:         {}", summary.total_jobs);
    println!("Total bruto:    {}", format_money(summary.total_gross));
    println!("Total liquido:  {}", format_money(summary.total_net));
    println!("Total FGTS:     {}", format_money(summary.total_fgts));

    Ok(())
}

/// List jobs worked for one operator
fn cmd_operator(cfg_dir: &Path, api_url: Option<&str>, id: &str) -> Result<()> {
    let records = client(cfg_dir, api_url)?.jobs_by_operator(id)?;

    if records.is_empty() {
        println!("No jobs found for operator {id}.");
        return Ok(());
    }

    let rows: Vec<JobRow> = records.iter().map(job_row).collect();
    println!("{}", Table::new(rows).with(Style::rounded()));

    let gross: f64 = records.iter().map(|r| r.values.gross).sum();
    println!("{} fainas, total bruto {}", records.len(), format_money(gross));

    Ok(())
}

/// List distinct statement periods
fn cmd_periods(cfg_dir: &Path, api_url: Option<&str>, filters: StatementFilters) -> Result<()> {
    let dashboard = dashboard(cfg_dir, api_url, DashboardOptions::default())?;
    let listing = dashboard.listing(&filters)?;

    let rows: Vec<PeriodRow> = listing
        .periods
        .into_iter()
        .map(|p| PeriodRow {
            label: p.label,
            month: p.month,
            year: p.year,
        })
        .collect();
    print_table("Periodos", rows);

    if !listing.categories.is_empty() {
        println!("Categorias: {}", listing.categories.join(", "));
    }

    Ok(())
}

fn source_tag(source: Source) -> &'static str {
    match source {
        Source::Server => "",
        Source::Local => " (local)",
    }
}

fn slice_rows(slices: &[BreakdownSlice]) -> Vec<NamedValueRow> {
    slices
        .iter()
        .map(|s| NamedValueRow {
            name: s.name.clone(),
            value: format_money(s.value),
        })
        .collect()
}

/// Print every dashboard view for one filter set
fn cmd_dashboard(
    cfg_dir: &Path,
    api_url: Option<&str>,
    filters: &DashboardFilters,
    options: DashboardOptions,
) -> Result<()> {
    let dashboard = dashboard(cfg_dir, api_url, options)?;
    let data = dashboard.load(filters)?;

    for warning in &data.warnings {
        eprintln!("Warning: {warning}");
    }

    if data.is_empty() {
        println!("No statements for the selected period.");
        return Ok(());
    }

    print_dashboard(&data);
    Ok(())
}

fn print_dashboard(data: &DashboardData) {
    let periods: Vec<&str> = data.periods.iter().map(|p| p.label.as_str()).collect();
    let kpis = &data.summary;

    println!("Dashboard");
    println!("{}", "-".repeat(50));
    println!("Periodos:               {}", periods.join(", "));
    println!("Extratos:               {}", data.statements.len());
    println!("Total de fainas:        {}", kpis.total_jobs);
    println!("Media fainas/semana:    {:.1}", kpis.average_jobs_per_week);
    println!("Dias trabalhados:       {}", kpis.worked_days);
    println!("Domingos/feriados:      {}", kpis.sundays_holidays_worked);
    println!(
        "Media bruto/faina:      {}",
        format_money(kpis.average_gross_per_job)
    );
    println!(
        "Media liquido/faina:    {}",
        format_money(kpis.average_net_per_job)
    );
    println!();

    let rows: Vec<CategoryRow> = data
        .category_totals
        .iter()
        .map(|c| CategoryRow {
            category: c.category.clone(),
            count: c.count,
            total: format_money(c.total_value),
        })
        .collect();
    print_table("Categorias", rows);

    let rows: Vec<MonthRow> = data
        .monthly
        .iter()
        .map(|m| MonthRow {
            name: m.name.clone(),
            jobs: m.jobs,
            total: format_money(m.total_value),
            average: format_money(m.average_value),
        })
        .collect();
    print_table("Fainas por mes", rows);

    let rows: Vec<OperatorRow> = data
        .operators
        .iter()
        .map(|o| OperatorRow {
            operator: o.operator_name.clone(),
            jobs: o.jobs,
            total: format_money(o.total_value),
            max_gross: format_money(o.max_gross),
            average: format_money(o.average_value),
            percentage: o.percentage.clone(),
        })
        .collect();
    print_table("Tomadores", rows);

    print_table(
        &format!("Composicao do salario{}", source_tag(data.salary.source)),
        slice_rows(&data.salary.data),
    );
    print_table(
        &format!("Retornos{}", source_tag(data.returns.source)),
        slice_rows(&data.returns.data),
    );

    let rows: Vec<CountRow> = data
        .shifts
        .data
        .iter()
        .map(|s| CountRow {
            name: s.name.clone(),
            count: s.value,
            percentage: format!("{:.1}", s.percentage()),
        })
        .collect();
    print_table(&format!("Turnos{}", source_tag(data.shifts.source)), rows);

    let rows: Vec<NamedValueRow> = data
        .weekly
        .data
        .iter()
        .map(|w| NamedValueRow {
            name: format!("{} ({})", w.week, w.total()),
            value: w
                .months
                .iter()
                .map(|(month, count)| format!("{month}: {count}"))
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();
    print_table(
        &format!("Fainas por semana{}", source_tag(data.weekly.source)),
        rows,
    );

    let rows: Vec<NamedValueRow> = data
        .top_jobs
        .data
        .iter()
        .map(|j| NamedValueRow {
            name: j.name.clone(),
            value: format_money(j.value),
        })
        .collect();
    print_table(
        &format!("Maiores fainas{}", source_tag(data.top_jobs.source)),
        rows,
    );

    let rows: Vec<FunctionRow> = data
        .functions
        .data
        .iter()
        .map(|f| FunctionRow {
            name: f.name.clone(),
            count: f.value,
            gross: format_money(f.total_value),
            average_gross: format_money(f.average_gross),
            average_net: format_money(f.average_net),
        })
        .collect();
    print_table(
        &format!("Funcoes{}", source_tag(data.functions.source)),
        rows,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_uses_brazilian_separators() {
        assert_eq!(format_money(0.0), "R$ 0,00");
        assert_eq!(format_money(1234.5), "R$ 1.234,50");
        assert_eq!(format_money(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_money(-12.5), "-R$ 12,50");
    }

    #[test]
    fn dates_must_be_iso() {
        assert_eq!(check_date("2024-03-01").unwrap(), "2024-03-01");
        assert!(matches!(
            check_date("01/03/2024"),
            Err(ExtratoError::InvalidDate(_))
        ));
    }
}
