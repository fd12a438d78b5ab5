use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use gacha_wheel::persisted_store::FileStorage;
use gacha_wheel::sound::spin_tick_schedule;
use gacha_wheel::{Clock, ManualClock, Session, SoundError, SoundPort, SystemClock};
use gacha_wheel_core::partition::{approx_group_size, max_group_count};
use gacha_wheel_core::{
    format_utc, segment_mid_angle, DrawMode, PairingRule, ParticipantId, PrefixPairing, Theme,
    GROUP_REVEAL_STEP_MS, SPIN_DURATION_MS,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use tracing_subscriber::EnvFilter;

type CliSession<'a> = Session<FileStorage, TerminalSound, &'a ManualClock>;

#[derive(Parser)]
#[command(name = "gacha-wheel", version, about = "Spin a wheel of names or split them into groups")]
struct Cli {
    #[arg(long, global = true, env = "GACHA_DATA_DIR", default_value = ".gacha-wheel")]
    data_dir: PathBuf,
    /// Seed for the random generator; a fresh one is drawn when omitted.
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Members {
        #[command(subcommand)]
        command: MemberCommand,
    },
    /// Spin the wheel once.
    Spin {
        #[arg(long)]
        no_wait: bool,
    },
    /// Drop the latest winner from the history.
    Undo,
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
    /// Split the roster into random groups.
    Groups {
        #[arg(long, short = 'k', default_value_t = 2)]
        count: usize,
        #[arg(long, env = "GACHA_PAIR_A", value_delimiter = ',')]
        pair_a: Vec<String>,
        #[arg(long, env = "GACHA_PAIR_B", value_delimiter = ',')]
        pair_b: Vec<String>,
        #[arg(long)]
        no_wait: bool,
        /// Write the result as a text file into this directory.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    /// Print the wheel segments.
    Layout,
}

#[derive(Subcommand)]
enum MemberCommand {
    List,
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
    Rename {
        id: u64,
        name: String,
    },
    Remove {
        id: u64,
    },
    Clear,
    /// Add names from a file, one per line (`-` reads stdin).
    Import {
        file: PathBuf,
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum HistoryCommand {
    Show,
    Reset,
    Export {
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    Show,
    Mode {
        #[arg(value_parser = parse_mode)]
        mode: DrawMode,
    },
    Theme {
        #[arg(value_parser = parse_theme)]
        theme: Theme,
    },
    Sound {
        state: Switch,
    },
    LockColors {
        state: Switch,
    },
    /// Replace the custom palette with `#RGB` / `#RRGGBB` colors.
    Colors {
        #[arg(required = true)]
        colors: Vec<String>,
    },
    ShuffleColors,
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl Switch {
    fn enabled(self) -> bool {
        matches!(self, Switch::On)
    }
}

/// Ticks as dots on stderr, fanfare as the terminal bell.
struct TerminalSound;

impl SoundPort for TerminalSound {
    fn play_tick(&mut self, _frequency_hz: f32) -> Result<(), SoundError> {
        let mut err = io::stderr().lock();
        err.write_all(b".")
            .and_then(|_| err.flush())
            .map_err(|e| SoundError(e.to_string()))
    }

    fn play_fanfare(&mut self, notes_hz: &[f32]) -> Result<(), SoundError> {
        let mut err = io::stderr().lock();
        let chime = "\u{7}♪".repeat(notes_hz.len().min(4));
        writeln!(err, " {chime}").map_err(|e| SoundError(e.to_string()))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    debug!(seed, data_dir = %cli.data_dir.display(), "starting");
    let mut rng = StdRng::seed_from_u64(seed);

    let storage = FileStorage::open(&cli.data_dir)?;
    let clock = ManualClock::new(SystemClock.now_ms());
    let mut session = Session::load(storage, TerminalSound, &clock);

    match cli.command {
        Commands::Members { command } => run_members(&mut session, command)?,
        Commands::Spin { no_wait } => run_spin(&mut session, &clock, &mut rng, no_wait),
        Commands::Undo => match session.undo() {
            Some(record) => println!("undone: {} (Seed: {})", record.winner_name, record.seed),
            None => println!("history is empty"),
        },
        Commands::History { command } => run_history(&mut session, command)?,
        Commands::Groups {
            count,
            pair_a,
            pair_b,
            no_wait,
            export,
        } => {
            let rule = PrefixPairing::new(&pair_a, &pair_b);
            let pairing = (!rule.is_empty()).then_some(&rule as &dyn PairingRule);
            run_groups(&mut session, &mut rng, count, pairing, no_wait, export.as_deref())?;
        }
        Commands::Settings { command } => run_settings(&mut session, &mut rng, command),
        Commands::Layout => {
            let colors = session.wheel_colors();
            for ((segment, member), color) in session
                .layout()
                .iter()
                .zip(session.roster().members())
                .zip(colors)
            {
                println!(
                    "{:>3}  {:<20} {:>8.2}° .. {:>8.2}°  label {:>8.2}°  {color}",
                    segment.color_index,
                    member.name,
                    segment.start_deg,
                    segment.end_deg,
                    segment_mid_angle(segment)
                );
            }
        }
    }

    Ok(())
}

fn run_members(session: &mut CliSession<'_>, command: MemberCommand) -> io::Result<()> {
    match command {
        MemberCommand::List => {
            for member in session.roster().members() {
                println!("{:>4}  {}", member.id, member.name);
            }
            println!("{} member(s)", session.roster().len());
        }
        MemberCommand::Add { names } => {
            for name in names {
                match session.add_participant(&name) {
                    Ok(id) => println!("added {id}: {}", name.trim()),
                    Err(err) => eprintln!("skipped '{name}': {err}"),
                }
            }
        }
        MemberCommand::Rename { id, name } => {
            if let Err(err) = session.rename_participant(ParticipantId(id), &name) {
                eprintln!("{err}");
            }
        }
        MemberCommand::Remove { id } => match session.remove_participant(ParticipantId(id)) {
            Some(member) => println!("removed {}", member.name),
            None => eprintln!("no member with id {id}"),
        },
        MemberCommand::Clear => session.clear_participants(),
        MemberCommand::Import { file, dry_run } => {
            let text = if file.as_os_str() == "-" {
                io::read_to_string(io::stdin())?
            } else {
                fs::read_to_string(&file)?
            };
            if dry_run {
                for name in session.import_preview(&text) {
                    println!("{name}");
                }
            } else {
                let added = session.import_names(&text);
                println!("imported {} member(s)", added.len());
            }
        }
    }
    Ok(())
}

fn run_spin<R: Rng>(session: &mut CliSession<'_>, clock: &ManualClock, rng: &mut R, no_wait: bool) {
    let Some(pending) = session.request_spin(rng) else {
        eprintln!("need at least two members to spin");
        return;
    };
    let seed = pending.seed.clone();

    if no_wait {
        clock.advance(SPIN_DURATION_MS);
    } else {
        // the first tick already played when the spin started
        let mut elapsed = 0;
        for offset in spin_tick_schedule(SPIN_DURATION_MS).into_iter().skip(1) {
            sleep_and_advance(clock, offset - elapsed);
            elapsed = offset;
            session.play_spin_tick();
        }
        sleep_and_advance(clock, SPIN_DURATION_MS - elapsed);
    }

    let Some(result) = session.complete_spin() else {
        return;
    };
    println!("winner: {} (Seed: {seed})", result.winner.name);
    if let Some(removed) = session.remove_winner() {
        println!("{} leaves the wheel ({} left)", removed.name, session.roster().len());
    }
}

fn run_history(session: &mut CliSession<'_>, command: HistoryCommand) -> io::Result<()> {
    match command {
        HistoryCommand::Show => {
            for record in session.history().recent() {
                println!(
                    "{}  {:<20} {}",
                    format_utc(record.timestamp_ms),
                    record.winner_name,
                    record.seed
                );
            }
        }
        HistoryCommand::Reset => session.reset_history(),
        HistoryCommand::Export { out_dir } => match session.history_export_text() {
            Some((name, text)) => write_export(&out_dir, &name, &text)?,
            None => eprintln!("history is empty"),
        },
    }
    Ok(())
}

fn run_groups<R: Rng>(
    session: &mut CliSession<'_>,
    rng: &mut R,
    count: usize,
    pairing: Option<&dyn PairingRule>,
    no_wait: bool,
    export: Option<&Path>,
) -> io::Result<()> {
    let total = session.roster().len();
    debug!(
        total,
        max = max_group_count(total),
        approx = approx_group_size(total, count),
        "partitioning"
    );
    let result = match session.partition_groups(rng, count, pairing) {
        Ok(snapshot) => snapshot.result.clone(),
        Err(err) => {
            eprintln!("{err}");
            return Ok(());
        }
    };

    for (member, group_index) in result.reveal() {
        if !no_wait {
            thread::sleep(Duration::from_millis(GROUP_REVEAL_STEP_MS as u64));
        }
        session.play_reveal_step(group_index);
        println!("{} → {}", member.name, result.groups[group_index].name());
    }
    session.play_reveal_done();

    for group in &result.groups {
        println!();
        println!("{} ({} orang)  {}", group.name(), group.len(), group.color());
        for member in &group.members {
            println!("  {}", member.name);
        }
    }

    if let Some(dir) = export {
        if let Some((name, text)) = session.group_export_text() {
            write_export(dir, &name, &text)?;
        }
    }
    Ok(())
}

fn run_settings<R: Rng>(session: &mut CliSession<'_>, rng: &mut R, command: SettingsCommand) {
    match command {
        SettingsCommand::Show => {
            let prefs = session.preferences();
            println!("mode: {}", prefs.mode);
            println!("theme: {} ({})", prefs.theme.id(), prefs.theme);
            println!("sound: {}", on_off(prefs.sound_enabled));
            println!("colors locked: {}", on_off(prefs.color_locked));
            println!("colors: {}", prefs.custom_colors.join(" "));
        }
        SettingsCommand::Mode { mode } => session.set_mode(mode),
        SettingsCommand::Theme { theme } => session.set_theme(theme),
        SettingsCommand::Sound { state } => session.set_sound_enabled(state.enabled()),
        SettingsCommand::LockColors { state } => session.set_color_locked(state.enabled()),
        SettingsCommand::Colors { colors } => {
            if let Err(err) = session.set_custom_colors(&colors) {
                eprintln!("{err}");
            }
        }
        SettingsCommand::ShuffleColors => {
            session.shuffle_colors(rng);
            println!("{}", session.preferences().custom_colors.join(" "));
        }
    }
}

fn write_export(dir: &Path, name: &str, text: &str) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, text)?;
    println!("wrote {}", path.display());
    Ok(())
}

fn sleep_and_advance(clock: &ManualClock, delta_ms: i64) {
    if delta_ms <= 0 {
        return;
    }
    thread::sleep(Duration::from_millis(delta_ms as u64));
    clock.advance(delta_ms);
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn parse_mode(raw: &str) -> Result<DrawMode, String> {
    DrawMode::from_str_opt(raw).ok_or_else(|| format!("unknown mode '{raw}' (class, game)"))
}

fn parse_theme(raw: &str) -> Result<Theme, String> {
    Theme::from_id(raw).ok_or_else(|| format!("unknown theme '{raw}' (default, gameboy, neon)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn pair_prefixes_split_on_commas() {
        let cli = Cli::try_parse_from([
            "gacha-wheel",
            "groups",
            "--count",
            "3",
            "--pair-a",
            "ko,kev",
            "--pair-b",
            "mi",
        ])
        .unwrap();
        match cli.command {
            Commands::Groups {
                count,
                pair_a,
                pair_b,
                ..
            } => {
                assert_eq!(count, 3);
                assert_eq!(pair_a, vec!["ko", "kev"]);
                assert_eq!(pair_b, vec!["mi"]);
            }
            _ => panic!("expected groups"),
        }
    }

    #[test]
    fn settings_values_parse() {
        assert_eq!(parse_mode("Game"), Ok(DrawMode::Game));
        assert_eq!(parse_theme("gameboy"), Ok(Theme::Gameboy));
        assert!(parse_mode("party").is_err());
    }
}
