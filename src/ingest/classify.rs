//! Classification of documents into book modules and chapter titles.
//!
//! Both functions are pure over the document's file name, so a chunk's
//! classification never depends on when or in what order it was ingested.

pub const MODULE_ROS2: &str = "Module 1: Robotic Nervous System (ROS 2)";
pub const MODULE_DIGITAL_TWIN: &str = "Module 2: Digital Twin (Gazebo + Unity)";
pub const MODULE_INTRODUCTION: &str = "Introduction";

/// Map a file name to its book module by case-insensitive substring match.
pub fn classify_module(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower.contains("ros2") || lower.contains("basics") {
        MODULE_ROS2
    } else if lower.contains("digital") || lower.contains("twin") {
        MODULE_DIGITAL_TWIN
    } else {
        MODULE_INTRODUCTION
    }
}

/// Derive a chapter title from a file name: drop the extension, turn
/// hyphens and underscores into spaces, and title-case each word.
pub fn derive_chapter_title(name: &str) -> String {
    let stem = name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name);
    stem.replace(['-', '_'], " ")
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ros2_files_map_to_module_one() {
        assert_eq!(classify_module("ros2_intro.md"), MODULE_ROS2);
        assert_eq!(classify_module("ROS2-nodes.md"), MODULE_ROS2);
        assert_eq!(classify_module("robot_basics.md"), MODULE_ROS2);
    }

    #[test]
    fn digital_twin_files_map_to_module_two() {
        assert_eq!(classify_module("digital_twin_setup.md"), MODULE_DIGITAL_TWIN);
        assert_eq!(classify_module("twin-simulation.md"), MODULE_DIGITAL_TWIN);
    }

    #[test]
    fn everything_else_is_introduction() {
        assert_eq!(classify_module("overview.md"), MODULE_INTRODUCTION);
        assert_eq!(classify_module("preface.md"), MODULE_INTRODUCTION);
    }

    #[test]
    fn ros2_wins_over_digital_twin() {
        // Matching is ordered: Module 1 substrings are checked first.
        assert_eq!(classify_module("ros2_digital_bridge.md"), MODULE_ROS2);
    }

    #[test]
    fn chapter_title_from_file_name() {
        assert_eq!(derive_chapter_title("intro-to-ros2.md"), "Intro To Ros2");
        assert_eq!(derive_chapter_title("digital_twin_setup.md"), "Digital Twin Setup");
        assert_eq!(derive_chapter_title("overview.md"), "Overview");
    }

    #[test]
    fn chapter_title_without_extension() {
        assert_eq!(derive_chapter_title("getting_started"), "Getting Started");
    }
}
