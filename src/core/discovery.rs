// src/core/discovery.rs

use crate::core::project::LaravelProject;
use std::path::Path;
use walkdir::WalkDir;

/// PHP fragment that scans the project for Eloquent models from inside Laravel.
/// Its output starts with [`crate::constants::MODEL_SCAN_BANNER`].
pub const LIST_MODELS_SNIPPET: &str = include_str!("php/list_models.inc.php");

/// Files directly in `app/` that are never offered as models.
const APP_DIR_EXCLUDES: &[&str] = &["User.php", "Model.php"];

/// Guesses model class names from the file layout, without running PHP.
///
/// Every `*.php` under `app/Models` (sub-directories become namespace
/// segments) yields `App\Models\...`; every `*.php` directly in `app/`
/// except `User.php` and `Model.php` yields `App\...` for pre-Laravel 8 layouts.
pub fn suggest_models(project: &LaravelProject) -> Vec<String> {
    let app_dir = project.app_dir();
    let mut suggestions = models_dir_suggestions(&app_dir.join("Models"));
    suggestions.extend(legacy_app_suggestions(&app_dir));
    log::debug!("Suggested {} model(s) from the filesystem", suggestions.len());
    suggestions
}

fn models_dir_suggestions(models_dir: &Path) -> Vec<String> {
    if !models_dir.is_dir() {
        return Vec::new();
    }

    let mut found: Vec<String> = WalkDir::new(models_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("Skipping unreadable entry during model discovery: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_php_file(entry.path()))
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(models_dir).ok()?.with_extension("");
            let segments: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            Some(format!("App\\Models\\{}", segments.join("\\")))
        })
        .collect();
    found.dedup();
    found
}

fn legacy_app_suggestions(app_dir: &Path) -> Vec<String> {
    if !app_dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(app_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && is_php_file(entry.path()))
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            !APP_DIR_EXCLUDES.contains(&name.as_ref())
        })
        .filter_map(|entry| {
            let stem = entry.path().file_stem()?.to_string_lossy().into_owned();
            Some(format!("App\\{}", stem))
        })
        .collect()
}

fn is_php_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "php")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MODEL_SCAN_BANNER;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<?php\n").unwrap();
    }

    #[test]
    fn test_suggestions_cover_both_layouts() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "app/Models/User.php");
        touch(dir.path(), "app/Models/Post.php");
        touch(dir.path(), "app/Models/Billing/Invoice.php");
        touch(dir.path(), "app/Models/README.md");
        touch(dir.path(), "app/Customer.php");
        touch(dir.path(), "app/User.php");
        touch(dir.path(), "app/Model.php");
        touch(dir.path(), "app/Http/Kernel.php");

        let project = LaravelProject::from_path(dir.path()).unwrap();
        let suggestions = suggest_models(&project);

        assert_eq!(
            suggestions,
            vec![
                "App\\Models\\Billing\\Invoice",
                "App\\Models\\Post",
                "App\\Models\\User",
                "App\\Customer",
            ]
        );
    }

    #[test]
    fn test_no_app_directory_means_no_suggestions() {
        let dir = tempdir().unwrap();
        let project = LaravelProject::from_path(dir.path()).unwrap();
        assert!(suggest_models(&project).is_empty());
    }

    #[test]
    fn test_snippet_prints_the_scan_banner() {
        assert!(LIST_MODELS_SNIPPET.contains(MODEL_SCAN_BANNER));
        // The snippet runs untransformed, but keep it free of static calls anyway.
        assert!(!LIST_MODELS_SNIPPET.contains("::"));
    }
}
