/// Collapses an anatomical part name into the facial region shown to the user.
/// Names outside the table are their own region.
pub fn display_region(part_name: &str) -> &str {
    match part_name {
        "forehead" | "glabella" => "이마",
        "left_eye" | "right_eye" => "눈가",
        "left_cheek" | "right_cheek" => "볼",
        "chin" => "턱",
        "nose_mouth" => "코/입",
        other => other,
    }
}

/// Region preselected in the report when the analysis produced no chart data.
pub const DEFAULT_REGION: &str = "이마";
