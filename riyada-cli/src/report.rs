//! Plain-text rendering of calculator results.

use std::fmt::Write;

use riyada_core::calculations::risk_matrix::MAX_RATING;
use riyada_core::calculations::{
    BreakEvenInput, BreakEvenResult, CashFlowStatement, DepreciationSchedule,
    IncomeStatementResult, LedgerRow, Payroll, RiskLevel, RiskMatrix, SalesPlanResult,
    SalesProjection, SiteMatrix, Timeline,
};

use crate::utils::{format_amount, opt_amount_display};

/// Column-aligned text table. The first column is left-aligned, the rest
/// right-aligned.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(
        &mut self,
        cells: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    pub fn render(&self) -> String {
        let columns = self.headers.len();
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(columns) {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        self.write_line(&mut out, &self.headers, &widths);
        let rule: usize = widths.iter().sum::<usize>() + 2 * columns.saturating_sub(1);
        out.push_str(&"-".repeat(rule));
        out.push('\n');
        for row in &self.rows {
            self.write_line(&mut out, row, &widths);
        }
        out
    }

    fn write_line(
        &self,
        out: &mut String,
        cells: &[String],
        widths: &[usize],
    ) {
        let mut line = String::new();
        for (i, width) in widths.iter().enumerate() {
            let cell = cells.get(i).map_or("", String::as_str);
            let pad = width.saturating_sub(cell.chars().count());
            if i > 0 {
                line.push_str("  ");
            }
            if i == 0 {
                line.push_str(cell);
                line.push_str(&" ".repeat(pad));
            } else {
                line.push_str(&" ".repeat(pad));
                line.push_str(cell);
            }
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
}

/// Two-column label/value listing.
fn summary(lines: &[(&str, String)]) -> String {
    let mut table = Table::new(["Item", "Amount"]);
    for (label, value) in lines {
        table.row([label.to_string(), value.clone()]);
    }
    table.render()
}

pub fn break_even(
    input: &BreakEvenInput,
    result: &BreakEvenResult,
) -> String {
    summary(&[
        ("Fixed costs", format_amount(input.fixed_costs)),
        ("Unit price", format_amount(input.unit_price)),
        ("Unit variable cost", format_amount(input.unit_variable_cost)),
        ("Contribution margin", format_amount(result.contribution_margin)),
        ("Break-even units", format_amount(result.break_even_units)),
        ("Break-even revenue", format_amount(result.break_even_revenue)),
        ("Profit on the next unit", format_amount(result.next_unit_profit)),
    ])
}

pub fn income_statement(result: &IncomeStatementResult) -> String {
    summary(&[
        ("Total sales", format_amount(result.total_sales)),
        ("Goods available for sale", format_amount(result.goods_available)),
        ("Cost of goods sold", format_amount(result.cost_of_goods_sold)),
        ("Gross profit", format_amount(result.gross_profit)),
        ("Total expenses", format_amount(result.total_expenses)),
        ("Net profit before tax", format_amount(result.net_profit)),
        ("Tax", format_amount(result.tax)),
        ("Net profit after tax", format_amount(result.net_profit_after_tax)),
    ])
}

pub fn cash_flow(statement: &CashFlowStatement) -> String {
    let mut table = Table::new(["Month", "Opening", "Inflows", "Outflows", "Surplus", "Closing"]);
    for (i, p) in statement.periods.iter().enumerate() {
        table.row([
            (i + 1).to_string(),
            format_amount(p.opening_cash),
            format_amount(p.total_inflows),
            format_amount(p.total_outflows),
            format_amount(p.surplus),
            format_amount(p.closing_cash),
        ]);
    }
    table.row([
        "Year".to_string(),
        String::new(),
        format_amount(statement.annual_inflows),
        format_amount(statement.annual_outflows),
        format_amount(statement.annual_surplus),
        format_amount(statement.closing_cash),
    ]);
    table.render()
}

fn sales_plan_cells(
    label: String,
    r: &SalesPlanResult,
) -> [String; 6] {
    [
        label,
        format_amount(r.gross_profit),
        format_amount(r.total_costs),
        format_amount(r.net_profit),
        format_amount(r.tax),
        format_amount(r.net_profit_after_tax),
    ]
}

pub fn sales_plan(projection: &SalesProjection) -> String {
    let mut table = Table::new([
        "Month",
        "Gross profit",
        "Total costs",
        "Net profit",
        "Tax",
        "After tax",
    ]);
    for (i, month) in projection.months.iter().enumerate() {
        table.row(sales_plan_cells((i + 1).to_string(), month));
    }
    table.row(sales_plan_cells("Total".to_string(), &projection.totals));
    table.render()
}

pub fn depreciation(schedule: &DepreciationSchedule) -> String {
    let mut table = Table::new(["Asset", "Price", "Rate %", "Annual depreciation", "Net value"]);
    for row in &schedule.rows {
        table.row([
            row.name.clone(),
            format_amount(row.price),
            format_amount(row.rate),
            format_amount(row.annual_depreciation),
            format_amount(row.net_value),
        ]);
    }
    table.row([
        "Total".to_string(),
        format_amount(schedule.totals.price),
        String::new(),
        format_amount(schedule.totals.annual_depreciation),
        format_amount(schedule.totals.net_value),
    ]);
    table.render()
}

pub fn ledger(rows: &[LedgerRow]) -> String {
    let mut table = Table::new(["Date", "Description", "Debit", "Credit", "Balance"]);
    for row in rows {
        table.row([
            row.date.clone(),
            row.description.clone(),
            opt_amount_display(row.debit),
            opt_amount_display(row.credit),
            format_amount(row.balance),
        ]);
    }
    table.render()
}

/// Risk list followed by the heat map, highest probability on top.
pub fn risk_matrix(matrix: &RiskMatrix) -> String {
    let mut list = Table::new(["Risk", "Probability", "Impact", "Score", "Level"]);
    for risk in matrix.risks() {
        list.row([
            risk.name.clone(),
            risk.probability.to_string(),
            risk.impact.to_string(),
            risk.score().to_string(),
            risk.level().label().to_string(),
        ]);
    }

    let mut headers = vec!["Probability \\ Impact".to_string()];
    headers.extend((1..=MAX_RATING).map(|i| i.to_string()));
    let mut grid = Table::new(headers);
    for (row, counts) in matrix.heat_map().iter().enumerate() {
        let mut cells = vec![(usize::from(MAX_RATING) - row).to_string()];
        cells.extend(counts.iter().map(|&n| match n {
            0 => ".".to_string(),
            n => n.to_string(),
        }));
        grid.row(cells);
    }

    let levels = [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low]
        .iter()
        .map(|level| format!("{}: {}", level.label(), matrix.count_at_level(*level)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("{}\n{}\n{levels}\n", list.render(), grid.render())
}

pub fn site_selection(matrix: &SiteMatrix) -> String {
    let mut table = Table::new(["Criterion", "Weight", "Site A", "Site B"]);
    for criterion in matrix.criteria() {
        table.row([
            criterion.name.clone(),
            criterion.weight.to_string(),
            criterion.score_a.to_string(),
            criterion.score_b.to_string(),
        ]);
    }
    let comparison = matrix.compare();
    table.row([
        "Weighted total".to_string(),
        String::new(),
        comparison.total_a.to_string(),
        comparison.total_b.to_string(),
    ]);

    let verdict = match comparison.preferred {
        Some(site) => format!("Preferred: {}", site.label()),
        None if comparison.total_a == 0 => "No scores entered".to_string(),
        None => "The sites are tied".to_string(),
    };
    format!("{}\n{verdict}\n", table.render())
}

/// Gantt chart: `#` marks a month the task is running. Tasks that continue
/// past the last column end in `>`.
pub fn timeline(timeline: &Timeline) -> String {
    let mut headers = vec!["Task".to_string()];
    headers.extend((1..=timeline.span()).map(|m| m.to_string()));
    let mut table = Table::new(headers);
    for row in timeline.chart() {
        let mut cells = vec![format!("{}. {}", row.id, row.name)];
        cells.extend(
            row.active
                .iter()
                .map(|&on| String::from(if on { "#" } else { "." })),
        );
        if row.clipped {
            if let Some(last) = cells.last_mut() {
                last.push('>');
            }
        }
        table.row(cells);
    }
    format!(
        "{}\nFinishes in month {}\n",
        table.render(),
        timeline.finish_month()
    )
}

pub fn staffing(payroll: &Payroll) -> String {
    let mut table = Table::new(["Role", "Count", "Monthly salary", "Monthly cost"]);
    for row in &payroll.rows {
        table.row([
            row.title.clone(),
            row.count.to_string(),
            format_amount(row.salary),
            format_amount(row.monthly_cost),
        ]);
    }
    table.row([
        "Total".to_string(),
        payroll.headcount.to_string(),
        String::new(),
        format_amount(payroll.monthly_total),
    ]);
    table.render()
}
