pub mod cleanup;
pub mod progress;

use std::convert::TryFrom;
use std::ffi::OsString;
use std::{io, result};

/// Long flags that are also accepted with a single dash, `-quiet` and
/// `-blocksize 512` / `-blocksize=512`.
const SINGLE_DASH_FLAGS: [&str; 2] = ["quiet", "blocksize"];

/// Rewrites single-dash long flags into the `--` form clap expects. Anything
/// after a bare `--` is left alone.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut positional_only = false;
    args.into_iter()
        .map(|arg| {
            if positional_only {
                return arg;
            }

            let rewritten = match arg.to_str() {
                Some("--") => {
                    positional_only = true;
                    None
                }
                Some(s) => s.strip_prefix('-').and_then(|flag| {
                    let name = flag.split('=').next().unwrap_or(flag);
                    if !flag.starts_with('-') && SINGLE_DASH_FLAGS.contains(&name) {
                        Some(OsString::from(format!("-{}", s)))
                    } else {
                        None
                    }
                }),
                None => None,
            };

            rewritten.unwrap_or(arg)
        })
        .collect()
}

pub fn setup_logging(verbosity_level: u32) -> result::Result<(), log::SetLoggerError> {
    use fern::colors::{Color, ColoredLevelConfig};

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::White)
        .debug(Color::BrightWhite)
        .trace(Color::Cyan);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let color = colors.get_color(&record.level());
            let foreground = color.to_fg_str();
            let target = record.target();
            let level = record.level();

            let prefix = format!("[{}][{}]\x1b[{}m ", target, level, foreground);
            const SUFFIX: &str = "\x1b[0m";

            let s = format!("{}", message);
            let num_lines = s.split('\n').count();
            let mut buf = String::with_capacity(s.len() + num_lines * (prefix.len() + SUFFIX.len() + 1));
            for (i, line) in s.split('\n').enumerate() {
                buf += &prefix;
                buf += line;
                buf += SUFFIX;
                if i != num_lines - 1 {
                    buf.push('\n');
                }
            }

            out.finish(format_args!("{}", buf))
        })
        .level(match verbosity_level {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        // stdout carries the progress line
        .chain(io::stderr())
        .apply()
}

pub fn parse_size(x: &str) -> result::Result<u64, String> {
    const MULTIPLIERS: [(char, u64); 5] = [
        ('K', 1024),
        ('M', 1024 * 1024),
        ('G', 1024 * 1024 * 1024),
        ('T', 1024 * 1024 * 1024 * 1024),
        ('E', 1024 * 1024 * 1024 * 1024 * 1024 * 1024),
    ];

    let (digits, multiplier) = match x.chars().last() {
        Some(y) if x.len() > 1 && !y.is_ascii_digit() => {
            let unit = y.to_ascii_uppercase();
            match MULTIPLIERS.iter().find(|(c, _)| *c == unit) {
                Some((_, m)) => (&x[..x.len() - y.len_utf8()], *m),
                None => return Err("Unknown unit".to_owned()),
            }
        }
        _ => (x, 1),
    };

    let n = digits.parse::<u64>().map_err(|e| e.to_string())?;
    n.checked_mul(multiplier)
        .ok_or_else(|| "Number too large to fit into u64".to_owned())
}

pub fn parse_block_size(x: &str) -> result::Result<usize, String> {
    let n = parse_size(x)?;
    if n == 0 {
        return Err("block size must be positive".to_owned());
    }

    usize::try_from(n).map_err(|e| e.to_string())
}

#[allow(non_upper_case_globals)]
pub fn size_to_string(s: u64) -> String {
    const KiB: u64 = 1024;
    const MiB: u64 = 1048576;
    const GiB: u64 = 1073741824;
    const TiB: u64 = 1099511627776;

    match s {
        0..=1023 => format!("{} B", s),
        1024..=1048575 => format!("{} KiB", s / KiB),
        1048576..=1073741823 => format!("{} MiB", s / MiB),
        1073741824..=1099511627775 => format!("{} GiB", s / GiB),
        _ => format!("{} TiB", s / TiB),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(x: &[&str]) -> Vec<OsString> {
        x.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_normalize_args() {
        assert_eq!(
            normalize_args(args(&["zerofill", "-quiet", "-blocksize", "512", "f.zro"])),
            args(&["zerofill", "--quiet", "--blocksize", "512", "f.zro"])
        );
        assert_eq!(
            normalize_args(args(&["zerofill", "-blocksize=1K", "--quiet", "-q", "-vv"])),
            args(&["zerofill", "--blocksize=1K", "--quiet", "-q", "-vv"])
        );
        assert_eq!(
            normalize_args(args(&["zerofill", "-b", "512", "-quietly", "--", "-quiet"])),
            args(&["zerofill", "-b", "512", "-quietly", "--", "-quiet"])
        );
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("432").unwrap(), 432);
        assert_eq!(parse_size("432K").unwrap(), 432 * 1024);
        assert_eq!(parse_size("432m").unwrap(), 432 * 1024 * 1024);
        assert_eq!(parse_size("7G").unwrap(), 7 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("0").unwrap(), 0);
        assert_eq!(parse_size("0E").unwrap(), 0);
        assert!(parse_size("12Q").is_err());
        assert!(parse_size("").is_err());
        assert!(parse_size("-1").is_err());
        assert!(parse_size("20000000E").is_err());
    }

    #[test]
    fn test_parse_block_size() {
        assert_eq!(parse_block_size("4096").unwrap(), 4096);
        assert_eq!(parse_block_size("1M").unwrap(), 1 << 20);
        assert!(parse_block_size("0").is_err());
        assert!(parse_block_size("0K").is_err());
    }

    #[test]
    fn test_size_to_string() {
        assert_eq!(size_to_string(1000), "1000 B");
        assert_eq!(size_to_string(10_000), "9 KiB");
        assert_eq!(size_to_string(5 * 1024 * 1024), "5 MiB");
        assert_eq!(size_to_string(3 * 1024 * 1024 * 1024 * 1024), "3 TiB");
    }
}
