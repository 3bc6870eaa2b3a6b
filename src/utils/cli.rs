//! Command-line argument parsing and help for fm.
//!
//! This module handles all CLI flag parsing used for config initialization and help.
//!
//! When invoked with no args/flags (fm), fm simply launches the TUI in the current directory.

use crate::config::Config;

pub enum CliAction {
    RunApp,
    RunAppAtPath(String),
    Exit,
    Fail,
}

pub fn handle_args() -> CliAction {
    let args: Vec<String> = std::env::args().skip(1).collect();
    parse_args(&args)
}

/// Parses the arguments after the program name. Printing flags are handled here.
pub fn parse_args(args: &[String]) -> CliAction {
    if args.is_empty() {
        return CliAction::RunApp;
    }

    if args.len() > 1 {
        eprintln!("Error: fm accepts only one argument at a time.");
        eprintln!("Usage: fm [PATH] or fm [OPTION]");
        return CliAction::Fail;
    }

    match args[0].as_str() {
        "--version" | "-v" => {
            print_version();
            CliAction::Exit
        }
        "-h" | "--help" => {
            print_help();
            CliAction::Exit
        }
        "--config-help" => {
            print_config_help();
            CliAction::Exit
        }
        "--keybinds" | "--keybind" | "--key" => {
            print_keybinds();
            CliAction::Exit
        }
        "--init" => {
            if let Err(e) = Config::generate_default(&Config::default_path()) {
                eprintln!("Error: {}", e);
                return CliAction::Fail;
            }
            CliAction::Exit
        }
        arg if !arg.starts_with('-') && !arg.trim().is_empty() => {
            CliAction::RunAppAtPath(arg.to_string())
        }
        arg => {
            eprintln!("Unknown argument: {}", arg);
            eprintln!("Try --help for available options");
            CliAction::Fail
        }
    }
}

fn print_version() {
    println!("fm {}", env!("CARGO_PKG_VERSION"));
}

fn print_help() {
    println!(
        r#"fm - A minimal single-pane terminal file browser

USAGE:
  fm [PATH]

PATH:
  Directory to open (defaults to current directory)

OPTIONS:
      --init              Generate the default configuration
      --config-help       Display all the configuration options
      --keybinds          Display all the default keybinds
  -h, --help              Print help information
  -v, --version           Display the current installed version of fm

ENVIRONMENT:
  FM_CONFIG               Override the default config path
  FM_LOG                  Write a log to this file
  FM_LOG_LEVEL            Log filter, e.g. "debug" or "fm_tui=trace" [default: info]
"#
    );
}

const KEYBINDS_TEXT: &str = r##"
=========================
 Key Bindings
=========================
  key   action   arg
  d     delete   false     Delete the entry under the cursor
  D     delete   true      Delete all marked entries
  h     nav      -1        Go to the parent directory
  j     step     1         Move down
  J     step     10        Move down 10 entries
  k     step     -1        Move up
  K     step     -10       Move up 10 entries
  l     nav      1         Enter the directory under the cursor
  n     touch    false     Create a file
  N     touch    true      Create a directory
  o     with               Open with the matching association
  q     quit
  r     nav      0         Reload
  .     dot                Toggle hidden entries
  " "   mark               Toggle the mark of the entry under the cursor

  Key syntax:
    Tokens:    "j", "^D" (Ctrl), "M-x" (Alt), "KEY_UP", "KEY_BACKSPACE", "KEY_F(1)"
    Aliases:   "space", "enter", "esc", "tab", "backspace", "up", "f1"
    Modifiers: "<c-x>", "<m-x>", "ctrl+x", "alt+x"

  Prompts:
    NAME:           Enter confirms, Backspace erases, any other key cancels
    delete? (Y/n)   Only an uppercase Y deletes
"##;

fn print_keybinds() {
    println!("{}", KEYBINDS_TEXT);
}

fn print_config_help() {
    let help_text = r##"
fm - Full Configuration Guide (fm.toml)

=========================
 General Settings
=========================
[general]
  show_hidden                Show hidden files (dotfiles) at startup [default: false]
  case_insensitive           Ignore case instead of locale collation [default: false]
  shell                      Shell used to run openers [default: "sh"]

=========================
 Key Bindings
=========================
[[keys]]                     Replaces the whole default table when present
  key                        Key token, see --keybinds
  action                     step, nav, touch, mark, dot, delete, with, quit
  arg                        step: delta, nav: -1/0/1, touch: directory?, delete: marked?

=========================
 Associations
=========================
[[assocs]]                   Replaces the whole default table when present
  pattern                    Case-insensitive regular expression on the name
  opener                     Program receiving the name as its argument

=========================
 Theme Configuration
=========================
Each entry supports fg/bg colors ("Red", "Blue", hex "#RRGGBB", or "default"):

[theme.path]                 Current path header
[theme.entry]                Normal entries
[theme.directory]            Directory entries
[theme.selection]            Cursor row [default: reversed video]
[theme.marker]               Mark glyph
[theme.status]               Footer line
"##;

    println!("{}{}", help_text, KEYBINDS_TEXT);
}
