// src/core/wrapper.rs

use crate::constants::{FACADE_IMPORTS, NON_MODEL_CLASSES};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

lazy_static! {
    static ref STATIC_CALL_CLASS_RE: Regex =
        Regex::new(r"([A-Z][A-Za-z0-9_]*)::").expect("valid regex");
}

const SCRIPT_HEADER: &str = "<?php
// Show every error, warning and notice.
ini_set('display_errors', 1);
ini_set('display_startup_errors', 1);
error_reporting(E_ALL);

";

const BOOTSTRAP_BLOCK: &str = r#"try {
    require __DIR__.'/vendor/autoload.php';
    $app = require_once __DIR__.'/bootstrap/app.php';
    $kernel = $app->make(Illuminate\Contracts\Console\Kernel::class);
    $kernel->bootstrap();
} catch (\Exception $e) {
    echo "Failed to bootstrap Laravel: " . $e->getMessage() . "\n";
    echo "In file: " . $e->getFile() . " line: " . $e->getLine() . "\n";
    exit(1);
}

"#;

const FORMAT_OUTPUT_HELPER: &str = r#"function formatOutput($data) {
    if (is_object($data) && method_exists($data, 'toArray')) {
        return json_encode($data->toArray(), JSON_PRETTY_PRINT);
    } elseif (is_object($data) && method_exists($data, 'toJson')) {
        return $data->toJson(JSON_PRETTY_PRINT);
    } elseif (is_array($data)) {
        return json_encode($data, JSON_PRETTY_PRINT);
    } else {
        return var_export($data, true);
    }
}

"#;

const USER_CODE_CATCH: &str = r#"
} catch (\Exception $e) {
    echo "Error: " . $e->getMessage() . "\n";
    echo "In file: " . $e->getFile() . " line: " . $e->getLine() . "\n";
}
"#;

/// Class names used with `::` in `code` that should be imported from `App\Models`.
/// Facades and other framework classes are skipped. Sorted and deduplicated.
pub fn detect_models(code: &str) -> BTreeSet<String> {
    STATIC_CALL_CLASS_RE
        .captures_iter(code)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|name| !NON_MODEL_CLASSES.contains(name))
        .map(str::to_string)
        .collect()
}

/// Builds the complete PHP script for one run: error reporting, imports,
/// Laravel bootstrap, the `formatOutput` helper and the user code inside a
/// try/catch.
pub fn build_script(code: &str) -> String {
    let models = detect_models(code);
    log::trace!("Models detected for import: {:?}", models);

    let mut script = String::with_capacity(
        SCRIPT_HEADER.len() + BOOTSTRAP_BLOCK.len() + FORMAT_OUTPUT_HELPER.len() + code.len() + 512,
    );
    script.push_str(SCRIPT_HEADER);

    for facade in FACADE_IMPORTS {
        script.push_str(&format!("use Illuminate\\Support\\Facades\\{};\n", facade));
    }
    for model in &models {
        script.push_str(&format!("use App\\Models\\{};\n", model));
    }
    script.push('\n');

    script.push_str(BOOTSTRAP_BLOCK);
    script.push_str(FORMAT_OUTPUT_HELPER);

    script.push_str("// User code:\ntry {\n");
    script.push_str(code);
    script.push_str(USER_CODE_CATCH);
    script
}
