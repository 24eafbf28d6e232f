use clap::Args;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use tracing::info;

use loan_emi_core::amortization::{build_schedule, AmortizationRow};
use loan_emi_core::analysis::{analyze_loan, summarize_loan};
use loan_emi_core::display::format_currency;
use loan_emi_core::LoanParameters;

use super::{conversion_note, display_rates, invalid, money};
use crate::config::Settings;
use crate::input;

/// Arguments describing a loan
#[derive(Args)]
pub struct LoanArgs {
    /// Loan amount in the base currency
    #[arg(long, alias = "amount", allow_hyphen_values = true)]
    pub principal: Option<f64>,

    /// Annual interest rate in percent (e.g. 5 for 5% p.a.)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<f64>,

    /// Loan term in months
    #[arg(long, alias = "months", allow_hyphen_values = true)]
    pub term: Option<i64>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<PathBuf>,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Use this installment instead of the computed EMI
    #[arg(long)]
    pub emi: Option<f64>,

    /// Page to show, starting at 1
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page (all rows when omitted)
    #[arg(long)]
    pub per_page: Option<usize>,
}

fn resolve_loan(args: &LoanArgs) -> Result<LoanParameters, Box<dyn std::error::Error>> {
    if let Some(params) = input::load_json::<LoanParameters>(args.input.as_deref())? {
        return Ok(params);
    }
    Ok(LoanParameters {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
        term_months: args.term.ok_or("--term is required (or provide --input)")?,
    })
}

fn schedule_row(row: &AmortizationRow, show: &dyn Fn(f64) -> Value) -> Value {
    json!({
        "period": row.period,
        "installment": show(row.installment),
        "principal": show(row.principal_component),
        "interest": show(row.interest_component),
        "balance": show(row.remaining_balance),
    })
}

pub fn run_emi(args: LoanArgs, settings: &Settings) -> Result<Value, Box<dyn std::error::Error>> {
    let params = resolve_loan(&args)?;
    info!(?params, "calculating EMI");

    let summary = summarize_loan(&params);
    let ctx = settings.display_context();
    let feed = display_rates(&ctx, settings);
    let shown = ctx.resolve(summary.emi, feed.rates());

    let mut result = Map::new();
    result.insert("emi".into(), money(shown.amount));
    result.insert("currency".into(), json!(shown.currency));
    result.insert("emi_display".into(), json!(shown.formatted()));
    result.insert("converted".into(), json!(shown.converted));
    result.insert("emi_base".into(), money(summary.emi));
    result.insert("base_currency".into(), json!(ctx.base_currency));
    if let Some(note) = conversion_note(&ctx, &feed) {
        result.insert("note".into(), json!(note));
    }

    Ok(json!({ "result": result }))
}

pub fn run_schedule(
    args: ScheduleArgs,
    settings: &Settings,
) -> Result<Value, Box<dyn std::error::Error>> {
    if args.page == 0 {
        return Err(invalid("page", "pages are numbered from 1"));
    }
    if args.per_page == Some(0) {
        return Err(invalid("per_page", "must be at least 1"));
    }
    let params = resolve_loan(&args.loan)?;
    let emi = args.emi.unwrap_or_else(|| params.emi());
    info!(?params, emi, "building amortization schedule");

    let schedule = build_schedule(
        params.principal,
        params.annual_rate_percent,
        params.term_months,
        emi,
    );

    let ctx = settings.display_context();
    let feed = display_rates(&ctx, settings);
    let rates = feed.rates();
    let show = |amount: f64| money(ctx.resolve(amount, rates).amount);

    let per_page = args.per_page.unwrap_or(schedule.len().max(1));
    let rows: Vec<Value> = schedule
        .page(args.page - 1, per_page)
        .iter()
        .map(|row| schedule_row(row, &show))
        .collect();

    let shown = ctx.resolve(emi, rates);
    let mut result = Map::new();
    result.insert("currency".into(), json!(shown.currency));
    result.insert("emi".into(), money(shown.amount));
    result.insert("total_rows".into(), json!(schedule.len()));
    result.insert("page".into(), json!(args.page));
    result.insert("total_pages".into(), json!(schedule.total_pages(per_page)));
    result.insert("rows".into(), Value::Array(rows));

    let mut warnings = Vec::new();
    if schedule.is_empty() {
        warnings.push(
            "Empty schedule: inputs are non-positive or the installment does not cover interest"
                .to_string(),
        );
    }
    if let Some(note) = conversion_note(&ctx, &feed) {
        warnings.push(note);
    }

    Ok(json!({ "result": result, "warnings": warnings }))
}

pub fn run_analyze(
    args: LoanArgs,
    settings: &Settings,
) -> Result<Value, Box<dyn std::error::Error>> {
    let params = resolve_loan(&args)?;
    info!(?params, "analyzing loan");

    let mut output = analyze_loan(&params);
    let ctx = settings.display_context();
    let feed = display_rates(&ctx, settings);
    let rates = feed.rates();
    let summary = &output.result.summary;

    let shown_emi = ctx.resolve(summary.emi, rates);
    let currency = shown_emi.currency.clone();
    let show = |amount: f64| money(ctx.resolve(amount, rates).amount);

    let summary_value = json!({
        "currency": currency,
        "principal": show(summary.principal),
        "annual_rate_percent": summary.annual_rate_percent,
        "term_months": summary.term_months,
        "term_years": (summary.term_years * 10.0).round() / 10.0,
        "emi": money(shown_emi.amount),
        "emi_display": format_currency(shown_emi.amount, &currency),
        "total_payment": show(summary.total_payment),
        "total_interest": show(summary.total_interest),
    });

    let rows: Vec<Value> = output
        .result
        .schedule
        .iter()
        .map(|row| schedule_row(row, &show))
        .collect();

    if let Some(note) = conversion_note(&ctx, &feed) {
        output.warnings.push(note);
    }

    let mut result = summary_value;
    result["rows"] = Value::Array(rows);

    Ok(json!({
        "result": result,
        "methodology": output.methodology,
        "assumptions": output.assumptions,
        "warnings": output.warnings,
        "metadata": output.metadata,
    }))
}
