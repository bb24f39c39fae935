use crate::report::View;
use crate::types::report::{
    AdjustmentLine, ClassLine, EvaluationResult, HistoryLine, RankTier, ScoreTable, Standing,
};

pub fn to_markdown(view: View<'_>) -> String {
    match view {
        View::Standings(standings) => standings_markdown(standings),
        View::Table(table) => table_markdown(table),
        View::Result(result) => result_markdown(result),
        View::History(lines) => history_markdown(lines),
        View::Adjustments(lines) => adjustments_markdown(lines),
        View::Classes(lines) => classes_markdown(lines),
    }
}

fn standings_markdown(standings: &[Standing]) -> String {
    let mut output = String::new();
    output.push_str("# Standings\n\n");
    if standings.is_empty() {
        output.push_str("- none\n");
        return output;
    }
    output.push_str("| rank | class | total | tier |\n|---|---|---|---|\n");
    for standing in standings {
        output.push_str(&format!(
            "| {} | {} | {:.2} | {} |\n",
            standing.rank,
            standing.class_id,
            standing.total,
            tier_label(standing.tier)
        ));
    }
    output
}

fn tier_label(tier: RankTier) -> &'static str {
    match tier {
        RankTier::FirstPlace => "first place",
        RankTier::TopFive => "top five",
        RankTier::Normal => "",
    }
}

fn table_markdown(table: &ScoreTable) -> String {
    let mut output = String::new();
    output.push_str("# Score Table\n\n");

    let mut header = vec!["班级".to_string()];
    header.extend(table.categories.iter().cloned());
    header.extend(["加权", "奖惩分", "奖惩备注", "总分"].map(str::to_string));
    output.push_str(&format!("| {} |\n", header.join(" | ")));
    output.push_str(&format!("|{}\n", "---|".repeat(header.len())));

    for row in &table.rows {
        let mut cells = vec![row.class_id.clone()];
        cells.extend(row.category_scores.iter().map(|score| format!("{score:.2}")));
        cells.push(format!("{:.2}", row.weighted_addition));
        cells.push(format!("{:.2}", row.adjustment_total));
        cells.push(row.adjustment_notes.replace('\n', "; "));
        cells.push(format!("{:.2}", row.total));
        output.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    output
}

fn result_markdown(result: &EvaluationResult) -> String {
    let mut output = String::new();
    output.push_str("# Evaluation Result\n\n");
    output.push_str("## 校级流动红旗\n\n");
    match &result.school_flag {
        Some(standing) => output.push_str(&format!(
            "- {} (total {:.2})\n",
            standing.class_id, standing.total
        )),
        None => output.push_str("- none\n"),
    }

    output.push_str("\n## 年级流动红旗\n\n");
    if result.grade_flags.is_empty() {
        output.push_str("- none\n");
    }
    for standing in &result.grade_flags {
        output.push_str(&format!(
            "- {} (total {:.2})\n",
            standing.class_id, standing.total
        ));
    }
    output
}

fn history_markdown(lines: &[HistoryLine]) -> String {
    let mut output = String::new();
    output.push_str("# History\n\n");
    if lines.is_empty() {
        output.push_str("- none\n");
    }
    for line in lines {
        output.push_str(&format!(
            "{} [{}] {} {}\n",
            if line.current { "*" } else { "-" },
            line.index,
            line.recorded_at,
            line.fingerprint
        ));
    }
    output
}

fn adjustments_markdown(lines: &[AdjustmentLine]) -> String {
    let mut output = String::new();
    output.push_str("# Adjustments\n\n");
    if lines.is_empty() {
        output.push_str("- none\n");
    }
    for line in lines {
        let sign = if line.kind == "add" { '+' } else { '-' };
        output.push_str(&format!(
            "- #{} {} {}{}: {}\n",
            line.id, line.class_id, sign, line.amount, line.note
        ));
    }
    output
}

fn classes_markdown(lines: &[ClassLine]) -> String {
    let mut output = String::new();
    output.push_str("# Classes\n\n");
    if lines.is_empty() {
        output.push_str("- none\n");
    }
    for line in lines {
        output.push_str(&format!(
            "{}. {} (weighted {})\n",
            line.position, line.class_id, line.weighted_addition
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::report::TableRow;

    #[test]
    fn standings_markdown_tags_top_ranks() {
        let standings = (1..=6)
            .map(|rank| Standing {
                rank,
                class_id: format!("高二{rank}班"),
                total: 120.0 - rank as f64,
                tier: RankTier::for_rank(rank),
            })
            .collect::<Vec<_>>();
        let rendered = to_markdown(View::Standings(&standings));
        assert!(rendered.contains("# Standings"));
        assert!(rendered.contains("| 1 | 高二1班 | 119.00 | first place |"));
        assert!(rendered.contains("| 5 | 高二5班 | 115.00 | top five |"));
        assert!(rendered.contains("| 6 | 高二6班 | 114.00 |  |"));
    }

    #[test]
    fn table_markdown_lists_every_column() {
        let table = ScoreTable {
            categories: vec!["早迟到".to_string(), "跑操".to_string()],
            rows: vec![TableRow {
                class_id: "高二1班".to_string(),
                category_scores: vec![10.0, 22.5],
                weighted_addition: 0.5,
                adjustment_total: -3.0,
                adjustment_notes: "迟到\n早退".to_string(),
                total: 30.0,
            }],
        };
        let rendered = to_markdown(View::Table(&table));
        assert!(rendered.contains("| 班级 | 早迟到 | 跑操 | 加权 | 奖惩分 | 奖惩备注 | 总分 |"));
        assert!(rendered.contains("| 高二1班 | 10.00 | 22.50 | 0.50 | -3.00 | 迟到; 早退 | 30.00 |"));
    }

    #[test]
    fn result_markdown_handles_empty_roster() {
        let result = EvaluationResult {
            school_flag: None,
            grade_flags: vec![],
        };
        let rendered = to_markdown(View::Result(&result));
        assert!(rendered.contains("## 校级流动红旗\n\n- none"));
        assert!(rendered.contains("## 年级流动红旗\n\n- none"));
    }
}
