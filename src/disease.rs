use crate::models::DiseaseScore;

/// Conditions the analysis model can predict, in display order.
pub const CANONICAL_CONDITIONS: [&str; 6] = ["건선", "아토피", "여드름", "주사", "지루", "정상"];

/// Lays the top predictions over the full condition list and orders it by
/// probability. Unknown conditions are appended before sorting; the sort is
/// stable so equal percentages keep list order.
pub fn merge_disease_ranking(top: &[DiseaseScore]) -> Vec<DiseaseScore> {
    let mut merged: Vec<DiseaseScore> = CANONICAL_CONDITIONS
        .iter()
        .map(|name| DiseaseScore {
            name: (*name).to_string(),
            percent: 0.0,
        })
        .collect();

    for score in top {
        match merged.iter_mut().find(|entry| entry.name == score.name) {
            Some(entry) => entry.percent = score.percent,
            None => merged.push(score.clone()),
        }
    }

    merged.sort_by(|a, b| b.percent.total_cmp(&a.percent));
    merged
}
