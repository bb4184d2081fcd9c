//! Module profiles: what varies between the problem and video hierarchies.

use crate::content::BlockType;

/// Capability record for one kind of content hierarchy.
///
/// The aggregator is the same for every profile; only the leaf type, the
/// subsection filter, the analytics key mapping and the drill-down routes
/// change.
#[derive(Debug, Clone)]
pub struct ModuleProfile {
    /// Stable name, also the cache key section.
    pub section_key: &'static str,
    pub module_type: BlockType,
    /// Restrict subsections by graded flag (`None` keeps all).
    pub subsection_graded: Option<bool>,
    /// Maps a leaf block ID to the analytics service's key.
    pub data_id: fn(&str) -> String,
    /// Dashboard area and route the drill-down links live under.
    pub area: &'static str,
    pub route: &'static str,
    /// Path segment per depth: section, subsection, module.
    pub levels: [&'static str; 3],
}

impl ModuleProfile {
    pub fn graded_problems() -> Self {
        Self {
            section_key: "graded_problems",
            module_type: BlockType::Problem,
            subsection_graded: Some(true),
            data_id: problem_data_id,
            area: "performance",
            route: "graded_content",
            levels: ["sections", "subsections", "problems"],
        }
    }

    pub fn ungraded_problems() -> Self {
        Self {
            section_key: "ungraded_problems",
            module_type: BlockType::Problem,
            subsection_graded: Some(false),
            data_id: problem_data_id,
            area: "performance",
            route: "ungraded_content",
            levels: ["sections", "subsections", "problems"],
        }
    }

    pub fn videos() -> Self {
        Self {
            section_key: "videos",
            module_type: BlockType::Video,
            subsection_graded: None,
            data_id: encode_module_id,
            area: "engagement",
            route: "videos",
            levels: ["sections", "subsections", "modules"],
        }
    }
}

/// Path segments for the assignment drill-down: assignment, problem.
pub const ASSIGNMENT_LEVELS: [&str; 2] = ["assignments", "problems"];

fn problem_data_id(block_id: &str) -> String {
    block_id.to_string()
}

/// HTML-safe module ID used by the video pipeline: every character other
/// than ASCII alphanumerics, `-` and `_` becomes `-`.
pub fn encode_module_id(block_id: &str) -> String {
    block_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Builds drill-down URLs under a configurable dashboard base path.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkBuilder {
    base_path: String,
}

impl LinkBuilder {
    pub fn new(base_path: impl Into<String>) -> Self {
        let base_path = base_path.into().trim_end_matches('/').to_string();
        Self { base_path }
    }

    /// `{base}/courses/{course}/{area}/{route}/{level}/{id}/...`
    ///
    /// `path` holds the node IDs from the top level down to the target;
    /// each is paired with the level name at the same depth. Returns `None`
    /// when the path is deeper than the available levels.
    pub fn build(
        &self,
        course_id: &str,
        area: &str,
        route: &str,
        levels: &[&str],
        path: &[&str],
    ) -> Option<String> {
        if path.is_empty() || path.len() > levels.len() {
            return None;
        }
        let mut url = format!(
            "{}/courses/{}/{}/{}/",
            self.base_path,
            urlencoding::encode(course_id),
            area,
            route
        );
        for (level, id) in levels.iter().zip(path) {
            url.push_str(level);
            url.push('/');
            url.push_str(&urlencoding::encode(id));
            url.push('/');
        }
        Some(url)
    }
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self::new("")
    }
}
