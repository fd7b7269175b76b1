use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Laravel,
    Php,
    Node,
    Generic,
}

pub fn detect_project_type(base_dir: &Path) -> ProjectType {
    if base_dir.join("artisan").exists() {
        ProjectType::Laravel
    } else if base_dir.join("composer.json").exists() {
        ProjectType::Php
    } else if base_dir.join("package.json").exists() {
        ProjectType::Node
    } else {
        ProjectType::Generic
    }
}

pub fn get_default_exclusions(project_type: ProjectType) -> Vec<&'static str> {
    let mut exclusions = vec![".git", ".svn", ".hg", ".idea", ".vscode", "node_modules"];

    match project_type {
        ProjectType::Laravel => {
            // storage/ holds compiled views
            exclusions.extend_from_slice(&[
                "vendor",
                "storage",
                "bootstrap",
                "public",
                "database",
                "tests",
            ]);
        }
        ProjectType::Php => {
            exclusions.extend_from_slice(&["vendor", "cache", "tests"]);
        }
        ProjectType::Node => {
            exclusions.extend_from_slice(&["dist", "build", "coverage", ".next", ".nuxt"]);
        }
        ProjectType::Generic => {
            exclusions.extend_from_slice(&["vendor", "dist", "build"]);
        }
    }

    exclusions
}
