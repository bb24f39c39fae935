use crate::report::View;

pub fn to_json(view: View<'_>) -> Result<String, serde_json::Error> {
    match view {
        View::Standings(standings) => serde_json::to_string_pretty(standings),
        View::Table(table) => serde_json::to_string_pretty(table),
        View::Result(result) => serde_json::to_string_pretty(result),
        View::History(lines) => serde_json::to_string_pretty(lines),
        View::Adjustments(lines) => serde_json::to_string_pretty(lines),
        View::Classes(lines) => serde_json::to_string_pretty(lines),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::report::{RankTier, Standing};

    #[test]
    fn json_standings_carry_rank_and_tier() {
        let standings = vec![Standing {
            rank: 1,
            class_id: "高二3班".to_string(),
            total: 122.0,
            tier: RankTier::FirstPlace,
        }];

        let rendered = to_json(View::Standings(&standings)).expect("json should serialize");
        assert!(rendered.contains("\"rank\": 1"));
        assert!(rendered.contains("\"tier\": \"first_place\""));
        assert!(rendered.contains("高二3班"));
    }
}
