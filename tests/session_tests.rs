//! Session and action tests for fm
//!
//! These tests drive the session state machine through a scripted console which feeds
//! key events from a queue and records every render and every launched program.
//! Launches are only executed for real where a test asks for it.
//!
//! Every test works in its own temporary directory, so nothing depends on the process
//! working directory.

use fm_tui::app::{DeleteScope, Dispatcher, InputEvent, NavTarget, Session};
use fm_tui::config::{AssocRule, Associations, Config, General};
use fm_tui::core::terminal::{Console, event_loop};
use fm_tui::core::{Launch, run_foreground};

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use std::error;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tempfile::tempdir;

#[derive(Default)]
struct ScriptedConsole {
    events: VecDeque<InputEvent>,
    launches: Vec<Launch>,
    statuses: Vec<String>,
    renders: usize,
    reinits: usize,
    execute: bool,
}

impl ScriptedConsole {
    fn with_keys(keys: &[&str]) -> Self {
        Self {
            events: keys.iter().map(|k| InputEvent::key(k)).collect(),
            ..Self::default()
        }
    }

    fn executing(mut self) -> Self {
        self.execute = true;
        self
    }
}

impl Console for ScriptedConsole {
    fn render(&mut self, session: &Session) -> io::Result<()> {
        self.renders += 1;
        self.statuses.push(session.status().to_string());
        Ok(())
    }

    fn next_event(&mut self) -> io::Result<InputEvent> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    fn reinit(&mut self) -> io::Result<()> {
        self.reinits += 1;
        Ok(())
    }

    fn run(&mut self, launch: &Launch) -> io::Result<()> {
        if self.execute {
            run_foreground(launch)?;
        }
        self.launches.push(launch.clone());
        Ok(())
    }
}

fn loaded_session(dir: &Path) -> Session {
    let mut session = Session::new(dir.to_path_buf(), &General::default());
    session.reload();
    session
}

fn names(session: &Session) -> Vec<String> {
    session
        .snapshot()
        .entries()
        .iter()
        .map(|e| e.name_str().into_owned())
        .collect()
}

fn argv(launch: &Launch) -> Vec<String> {
    launch
        .argv()
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_directories_sort_first() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("b.txt"))?;
    fs::create_dir(dir.path().join("A"))?;

    let session = loaded_session(dir.path());
    assert_eq!(names(&session), vec!["A", "b.txt"]);
    assert_eq!(session.cursor(), Some(0));
    Ok(())
}

#[test]
fn test_ordering_holds_for_shuffled_names() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    let mut rng = rand::rng();

    let mut created: Vec<(String, bool)> = (0..40)
        .map(|i| {
            let upper = rng.random_bool(0.5);
            let base = format!("{}{i:02}", if upper { 'N' } else { 'n' });
            (base, rng.random_bool(0.3))
        })
        .collect();
    created.shuffle(&mut rng);

    for (name, is_dir) in &created {
        if *is_dir {
            fs::create_dir(dir.path().join(name))?;
        } else {
            File::create(dir.path().join(name))?;
        }
    }

    let session = loaded_session(dir.path());
    let entries = session.snapshot().entries();
    assert_eq!(entries.len(), created.len());

    for pair in entries.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.is_dir() >= b.is_dir(), "directory after file");
        // this binary never calls setlocale: C collation, i.e. byte order
        if a.is_dir() == b.is_dir() {
            assert!(
                a.name() <= b.name(),
                "{:?} before {:?}",
                a.name(),
                b.name()
            );
        }
    }
    Ok(())
}

#[test]
fn test_step_clamps() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    for name in ["a", "b", "c", "d", "e"] {
        File::create(dir.path().join(name))?;
    }
    let mut session = loaded_session(dir.path());
    let len = session.snapshot().len();

    for n in 1..=8 {
        session.action_step(1);
        assert_eq!(session.cursor(), Some(n.min(len - 1)));
    }

    session.action_step(-100);
    assert_eq!(session.cursor(), Some(0));
    session.action_step(isize::MAX);
    assert_eq!(session.cursor(), Some(len - 1));
    session.action_step(isize::MIN);
    assert_eq!(session.cursor(), Some(0));
    Ok(())
}

#[test]
fn test_cursor_stays_in_bounds() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    for i in 0..12 {
        File::create(dir.path().join(format!("f{i}")))?;
    }
    let mut session = loaded_session(dir.path());
    let mut rng = rand::rng();

    for _ in 0..200 {
        match rng.random_range(0..4) {
            0 => session.action_mark(),
            1 => session.action_nav(NavTarget::Reload),
            _ => session.action_step(rng.random_range(-15i32..=15) as isize),
        }
        if session.flags().needs_reload() {
            session.reload();
        }
        let cursor = session.cursor().ok_or("cursor missing")?;
        assert!(cursor < session.snapshot().len());
    }
    Ok(())
}

#[test]
fn test_empty_directory_actions_are_noops() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    let mut session = loaded_session(dir.path());
    let mut console = ScriptedConsole::with_keys(&["Y"]);
    let flags = session.flags();

    assert_eq!(session.cursor(), None);
    session.action_step(1);
    session.action_mark();
    session.action_nav(NavTarget::Enter);
    session.action_delete(&mut console, DeleteScope::Selected)?;
    session.action_with(&mut console, "sh", &Associations::default())?;

    assert_eq!(session.flags(), flags);
    assert_eq!(session.cursor(), None);
    assert!(console.launches.is_empty());
    assert_eq!(console.events.len(), 1, "no prompt on an empty snapshot");
    Ok(())
}

#[test]
fn test_mark_lost_on_reload() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("one"))?;
    File::create(dir.path().join("two"))?;
    let mut session = loaded_session(dir.path());

    session.action_mark();
    assert!(session.snapshot().entries()[0].is_marked());
    session.action_step(1);
    session.action_nav(NavTarget::Reload);
    assert!(session.flags().needs_reload());
    session.reload();

    assert_eq!(session.snapshot().marked().count(), 0);
    assert_eq!(session.cursor(), Some(0));
    Ok(())
}

#[test]
fn test_dot_twice_restores_entries() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join(".hidden"))?;
    File::create(dir.path().join("shown"))?;
    let mut session = loaded_session(dir.path());
    let before = names(&session);
    assert_eq!(before, vec!["shown"]);

    session.action_mark();
    session.action_dot();
    session.reload();
    assert_eq!(names(&session), vec![".hidden", "shown"]);

    session.action_dot();
    session.reload();
    assert_eq!(names(&session), before);
    assert_eq!(session.snapshot().marked().count(), 0);
    Ok(())
}

#[test]
fn test_nav_into_and_out_of_directory() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    let root = fs::canonicalize(dir.path())?;
    fs::create_dir(root.join("sub"))?;
    File::create(root.join("sub/inner"))?;
    File::create(root.join("zfile"))?;
    let mut session = loaded_session(&root);

    session.action_nav(NavTarget::Enter);
    session.reload();
    assert_eq!(session.current_path(), root.join("sub"));
    assert_eq!(names(&session), vec!["inner"]);

    session.action_nav(NavTarget::Enter);
    assert!(session.flags().needs_reload(), "file target still reloads");
    session.reload();
    assert_eq!(session.current_path(), root.join("sub"));

    session.action_nav(NavTarget::Parent);
    session.reload();
    assert_eq!(session.current_path(), root);
    assert_eq!(names(&session), vec!["sub", "zfile"]);
    Ok(())
}

#[test]
fn test_nav_parent_at_root_stays() {
    let mut session = loaded_session(Path::new("/"));
    session.action_nav(NavTarget::Parent);
    session.reload();
    assert_eq!(session.current_path(), Path::new("/"));
}

#[test]
fn test_delete_marked_spawns_one_rm_per_mark() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    for name in ["e0", "e1", "e2", "e3", "e4"] {
        File::create(dir.path().join(name))?;
    }
    let mut session = loaded_session(dir.path());

    session.action_step(1);
    session.action_mark();
    session.action_step(2);
    session.action_mark();

    let mut console = ScriptedConsole::with_keys(&["Y"]);
    session.action_delete(&mut console, DeleteScope::Marked)?;

    let rm: Vec<Vec<String>> = console.launches.iter().map(argv).collect();
    assert_eq!(
        rm,
        vec![
            vec!["rm".to_string(), "-rf".into(), "e1".into()],
            vec!["rm".to_string(), "-rf".into(), "e3".into()],
        ]
    );
    assert!(console.launches.iter().all(|l| l.cwd() == session.current_path()));
    assert_eq!(console.statuses, vec!["delete? (Y/n)"]);
    assert!(session.flags().needs_reload());
    assert!(session.flags().needs_redraw());
    Ok(())
}

#[test]
fn test_delete_requires_uppercase_y() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("keep"))?;
    let mut session = loaded_session(dir.path());

    for key in ["y", "n", "^J", "^["] {
        let mut console = ScriptedConsole::with_keys(&[key]);
        session.action_delete(&mut console, DeleteScope::Selected)?;
        assert!(console.launches.is_empty(), "{key} deleted");
        assert!(!session.flags().needs_reload());
        assert!(session.flags().needs_redraw());
    }

    let mut console = ScriptedConsole::with_keys(&["Y"]).executing();
    session.action_delete(&mut console, DeleteScope::Selected)?;
    assert_eq!(console.launches.len(), 1);
    session.reload();
    assert!(session.snapshot().is_empty());
    Ok(())
}

#[test]
fn test_touch_prompt_edits_and_creates() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    let mut session = loaded_session(dir.path());
    let mut console =
        ScriptedConsole::with_keys(&["a", "b", "KEY_BACKSPACE", "c", " ", "d", "^J"]).executing();

    session.action_touch(&mut console, false)?;

    assert_eq!(console.statuses.first().map(String::as_str), Some("NAME: "));
    assert_eq!(console.statuses.last().map(String::as_str), Some("NAME: ac d"));
    assert_eq!(console.launches.len(), 1);
    assert_eq!(argv(&console.launches[0]), vec!["touch", "ac d"]);
    assert!(session.flags().needs_reload());

    session.reload();
    assert_eq!(names(&session), vec!["ac d"]);
    Ok(())
}

#[test]
fn test_touch_directory() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    let mut session = loaded_session(dir.path());
    let mut console = ScriptedConsole::with_keys(&["s", "u", "b", "^M"]).executing();

    session.action_touch(&mut console, true)?;
    session.reload();

    assert_eq!(names(&session), vec!["sub"]);
    assert!(session.snapshot().entries()[0].is_dir());
    Ok(())
}

#[test]
fn test_touch_cancel_keys() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    let mut session = loaded_session(dir.path());

    for script in [
        vec![InputEvent::key("x"), InputEvent::key("^[")],
        vec![InputEvent::key("x"), InputEvent::key("KEY_UP")],
        vec![InputEvent::key("x"), InputEvent::Resize],
        vec![InputEvent::key("^J")],
    ] {
        let mut console = ScriptedConsole {
            events: script.into(),
            ..ScriptedConsole::default()
        };
        session.action_touch(&mut console, false)?;
        assert!(console.launches.is_empty());
        assert!(!session.flags().needs_reload());
    }
    Ok(())
}

#[test]
fn test_touch_name_is_capped() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    let mut session = loaded_session(dir.path());
    let mut events: VecDeque<InputEvent> = (0..150).map(|_| InputEvent::key("x")).collect();
    events.push_back(InputEvent::key("^J"));
    let mut console = ScriptedConsole {
        events,
        ..ScriptedConsole::default()
    };

    session.action_touch(&mut console, false)?;
    let name = argv(&console.launches[0]).pop().unwrap_or_default();
    assert_eq!(name.len(), 99);
    Ok(())
}

#[test]
fn test_with_passes_name_as_positional() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("it's \"odd\".PDF"))?;
    let mut session = loaded_session(dir.path());
    let mut console = ScriptedConsole::default();

    session.action_with(&mut console, "sh", &Associations::default())?;

    assert_eq!(console.launches.len(), 1);
    assert_eq!(
        console.launches[0].argv(),
        &[
            OsString::from("sh"),
            OsString::from("-c"),
            OsString::from("zathura \"$1\""),
            OsString::from("sh"),
            OsString::from("it's \"odd\".PDF"),
        ]
    );
    assert!(!session.flags().needs_reload());
    Ok(())
}

#[test]
fn test_with_without_match_is_noop() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("notes.txt"))?;
    let mut session = loaded_session(dir.path());
    let mut console = ScriptedConsole::default();
    let assocs = Associations::from_rules(&[AssocRule::new(r"\.md$", "glow")]);

    session.action_with(&mut console, "sh", &assocs)?;
    assert!(console.launches.is_empty());
    Ok(())
}

#[test]
fn test_event_loop_quits_without_final_draw() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("a"))?;
    File::create(dir.path().join("b"))?;
    let config = Config::default();
    let dispatcher = Dispatcher::new(&config);
    let mut session = Session::new(dir.path().to_path_buf(), config.general());
    let mut console = ScriptedConsole::with_keys(&["j", "z", "q"]);

    event_loop(&mut session, &dispatcher, &mut console)?;

    // initial draw, then one after "j"; "z" is unbound and "q" quits
    assert_eq!(console.renders, 2);
    assert!(session.flags().needs_quit());
    assert_eq!(session.cursor(), Some(1));
    Ok(())
}

#[test]
fn test_event_loop_resize_redraws() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    let config = Config::default();
    let dispatcher = Dispatcher::new(&config);
    let mut session = Session::new(dir.path().to_path_buf(), config.general());
    let mut console = ScriptedConsole {
        events: vec![InputEvent::Resize, InputEvent::key("q")].into(),
        ..ScriptedConsole::default()
    };

    event_loop(&mut session, &dispatcher, &mut console)?;
    assert_eq!(console.reinits, 1);
    assert_eq!(console.renders, 2);
    Ok(())
}

#[test]
fn test_event_loop_default_bindings() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("old"))?;
    let config = Config::default();
    let dispatcher = Dispatcher::new(&config);
    let mut session = Session::new(dir.path().to_path_buf(), config.general());
    let mut console = ScriptedConsole::with_keys(&[
        "N", "n", "e", "w", "^J", // mkdir new
        "l", // enter it
        "h", // back out
        "d", "Y", // delete the cursor entry, "new" sorts first
        "q",
    ])
    .executing();

    event_loop(&mut session, &dispatcher, &mut console)?;

    let shapes: Vec<Vec<String>> = console.launches.iter().map(argv).collect();
    assert_eq!(
        shapes,
        vec![
            vec!["mkdir".to_string(), "new".into()],
            vec!["rm".to_string(), "-rf".into(), "new".into()],
        ]
    );
    session.reload();
    assert_eq!(names(&session), vec!["old"]);
    Ok(())
}

#[test]
fn test_metadata_failure_is_reported() -> Result<(), Box<dyn error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("real"))?;
    std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling"))?;

    let config = Config::default();
    let dispatcher = Dispatcher::new(&config);
    let mut session = Session::new(dir.path().to_path_buf(), config.general());
    let mut console = ScriptedConsole::with_keys(&["q"]);

    event_loop(&mut session, &dispatcher, &mut console)?;
    assert_eq!(names(&session), vec!["real"]);
    assert_eq!(console.statuses.len(), 1);
    assert!(
        console.statuses[0].starts_with("1 entry skipped: metadata unavailable"),
        "{:?}",
        console.statuses
    );
    Ok(())
}
