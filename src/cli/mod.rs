use clap::Parser;

/// Command registry and routing.
pub mod dispatcher;
/// One handler per command.
pub mod handlers;

/// Builds the color-aware help string at runtime.
fn build_help_string() -> &'static str {
    // Replaces the semantic tags of the help template with ANSI styles.
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let template = t!("cli.help.template");

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let hl = if use_colors { "\x1b[1;36m" } else { "" }; // Bold Cyan
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let group = if use_colors { "\x1b[1;32m" } else { "" }; // Bold Green
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// laratinker: run PHP snippets against a Laravel application.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
/// Top-level arguments. Everything is handed to the dispatcher.
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// Everything after the binary name. Each handler parses its own share,
    /// so flags such as `-p` may come first and reach the `run` shortcut.
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_flags_are_passed_through() {
        let cli = Cli::try_parse_from(["laratinker", "-p", "/srv/app", "User::all()"]).unwrap();
        assert_eq!(cli.args, vec!["-p", "/srv/app", "User::all()"]);

        let cli = Cli::try_parse_from(["laratinker", "--no-transform", "User::all()"]).unwrap();
        assert_eq!(cli.args, vec!["--no-transform", "User::all()"]);
    }

    #[test]
    fn test_commands_keep_their_flags() {
        let cli = Cli::try_parse_from(["laratinker", "artisan", "-p", "/srv/app", "route:list"])
            .unwrap();
        assert_eq!(cli.args, vec!["artisan", "-p", "/srv/app", "route:list"]);
    }

    #[test]
    fn test_help_flag_is_still_handled_by_clap() {
        let err = Cli::try_parse_from(["laratinker", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
