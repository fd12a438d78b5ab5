use crate::history::HistoryRecord;
use crate::partition::PartitionResult;

pub const SEPARATOR_WIDTH: usize = 40;
pub const HISTORY_HEADER: &str = "🎰 GACHA WHEEL - SPIN HISTORY";
pub const GROUPS_HEADER: &str = "🎲 HASIL PEMBAGIAN KELOMPOK";
pub const GROUP_MARKER: &str = "📌";

pub fn separator() -> String {
    "═".repeat(SEPARATOR_WIDTH)
}

pub fn history_file_name(now_ms: i64) -> String {
    format!("gacha-history-{now_ms}.txt")
}

pub fn groups_file_name(now_ms: i64) -> String {
    format!("kelompok-{now_ms}.txt")
}

pub fn history_text<F>(records: &[HistoryRecord], format_time: F) -> String
where
    F: Fn(i64) -> String,
{
    let mut lines = vec![HISTORY_HEADER.to_string(), separator(), String::new()];
    for (idx, record) in records.iter().enumerate() {
        lines.push(format!(
            "{}. {} - {} (Seed: {})",
            idx + 1,
            record.winner_name,
            format_time(record.timestamp_ms),
            record.seed
        ));
    }
    lines.push(String::new());
    lines.push(separator());
    lines.push(format!("Total Spins: {}", records.len()));
    lines.join("\n")
}

pub fn groups_text<F>(result: &PartitionResult, generated_at_ms: i64, format_time: F) -> String
where
    F: Fn(i64) -> String,
{
    let mut lines = vec![
        GROUPS_HEADER.to_string(),
        separator(),
        format!(
            "Total: {} anggota → {} kelompok",
            result.total(),
            result.group_count()
        ),
        format!("Waktu: {}", format_time(generated_at_ms)),
        String::new(),
    ];
    for group in &result.groups {
        lines.push(format!(
            "{GROUP_MARKER} {} ({} orang)",
            group.name(),
            group.len()
        ));
        for (idx, member) in group.members.iter().enumerate() {
            lines.push(format!("   {}. {}", idx + 1, member.name));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn format_utc(timestamp_ms: i64) -> String {
    let secs = timestamp_ms.div_euclid(1000);
    let days = secs.div_euclid(86_400);
    let rem = secs.rem_euclid(86_400);
    let (year, month, day) = civil_from_days(days);
    format!(
        "{year:04}-{month:02}-{day:02} {:02}:{:02}:{:02}",
        rem / 3600,
        rem % 3600 / 60,
        rem % 60
    )
}

fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
