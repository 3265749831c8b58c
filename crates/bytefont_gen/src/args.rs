use std::{ffi::OsString, ops::Range, path::PathBuf, str::FromStr};

use bytefont::ByteFontType;
use clap::{
    error::{ContextKind, ContextValue, ErrorKind},
    value_parser, Parser,
};

const DEFAULT_RANGE_START: u32 = 0;
const DEFAULT_RANGE_END: u32 = 256;

#[derive(Parser, Debug)]
#[command(version, about = "Generates byte font (.bff) files from TrueType/OpenType fonts.", long_about = None)]
pub struct Args {
    #[arg(short, long, help = "Write a comment line in front of every glyph.")]
    pub comments: bool,

    #[arg(short, long, value_name = "LEVEL", default_value_t = 1, value_parser = value_parser!(u8).range(1..=3), help = "1 = info, 2 = debug, 3 = trace (dumps every glyph)")]
    pub verbose: u8,

    #[arg(short, long, value_name = "PATH", help = "TrueType/OpenType font file.")]
    pub font: PathBuf,

    #[arg(short, long, help = "Font name stored in the file (default: font file name).")]
    pub name: Option<String>,

    #[arg(short, long, value_name = "PT", default_value_t = 10, value_parser = value_parser!(i32).range(1..))]
    pub size: i32,

    #[arg(short = 'y', long, value_name = "STYLE", default_value = "PLAIN", value_parser = parse_style, help = "PLAIN, BOLD, ITALIC (or P, B, I) or a raw style number.")]
    pub style: i32,

    #[arg(short, long, num_args = 1..=2, value_names = ["START", "END"], help = "Code point range, end is exclusive [default: 0 256]")]
    pub range: Vec<u32>,

    #[arg(short, long, value_name = "PATH", help = "Output file (default: {font}_{p|b|i}_{size}.bff).")]
    pub out: Option<PathBuf>,
}

fn parse_style(s: &str) -> Result<i32, String> {
    if let Ok(value) = s.parse::<i32>() {
        if value <= 0 {
            return Err(format!("style must be greater than 0, got {value}"));
        }
        return Ok(value);
    }
    ByteFontType::from_str(s).map(ByteFontType::value)
}

/// The argument clap could not place, as it appeared on the command line.
fn unknown_argument(err: &clap::Error) -> Option<String> {
    if err.kind() != ErrorKind::UnknownArgument {
        return None;
    }
    match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => Some(arg.clone()),
        _ => None,
    }
}

fn matches_token(token: &OsString, arg: &str) -> bool {
    token
        .to_str()
        .is_some_and(|token| token == arg || token.strip_prefix(arg).is_some_and(|rest| rest.starts_with('=')))
}

impl Args {
    /// Parses like [`Parser::try_parse_from`] but drops unknown flags and
    /// surplus values instead of failing. Returns the dropped tokens.
    pub fn parse_lenient<I, T>(args: I) -> Result<(Self, Vec<String>), clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let mut ignored = Vec::new();
        loop {
            let err = match Self::try_parse_from(args.iter()) {
                Ok(parsed) => return Ok((parsed, ignored)),
                Err(err) => err,
            };
            let Some(arg) = unknown_argument(&err) else {
                return Err(err);
            };
            // index 0 is the binary name
            let Some(pos) = args.iter().skip(1).position(|token| matches_token(token, &arg)) else {
                return Err(err);
            };
            ignored.push(args.remove(pos + 1).to_string_lossy().into_owned());
        }
    }

    pub fn font_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.font.file_stem().map_or_else(|| "font".to_string(), |s| s.to_string_lossy().into_owned())
    }

    pub fn char_range(&self) -> Range<u32> {
        let start = self.range.first().copied().unwrap_or(DEFAULT_RANGE_START);
        let end = self.range.get(1).copied().unwrap_or(DEFAULT_RANGE_END);
        start..end
    }

    pub fn default_file_name(&self) -> String {
        let suffix = ByteFontType::from_value(self.style).map_or('i', ByteFontType::suffix);
        format!("{}_{}_{}.bff", self.font_name().to_lowercase().replace(' ', ""), suffix, self.size)
    }

    /// `--out` if given, the default name inside it if it is a directory.
    pub fn output_path(&self) -> PathBuf {
        match &self.out {
            Some(out) if out.is_dir() => {
                log::warn!("output '{}' is a directory, using default file name", out.display());
                out.join(self.default_file_name())
            }
            Some(out) => out.clone(),
            None => PathBuf::from(self.default_file_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("bytefont_gen").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["-f", "fonts/DejaVu Sans.ttf"]);
        assert!(!args.comments);
        assert_eq!(args.verbose, 1);
        assert_eq!(args.size, 10);
        assert_eq!(args.style, ByteFontType::Plain.value());
        assert_eq!(args.char_range(), 0..256);
        assert_eq!(args.font_name(), "DejaVu Sans");
        assert_eq!(args.output_path(), PathBuf::from("dejavusans_p_10.bff"));
    }

    #[test]
    fn test_all_flags() {
        let args = parse(&[
            "--comments", "--verbose", "3", "--font", "a.ttf", "--name", "Arial", "--size", "12", "--style", "bold", "--range", "32", "127", "--out", "out/arial.bff",
        ]);
        assert!(args.comments);
        assert_eq!(args.verbose, 3);
        assert_eq!(args.font_name(), "Arial");
        assert_eq!(args.size, 12);
        assert_eq!(args.style, 2);
        assert_eq!(args.char_range(), 32..127);
        assert_eq!(args.output_path(), PathBuf::from("out/arial.bff"));
    }

    #[test]
    fn test_short_flags() {
        let args = parse(&["-c", "-v", "2", "-f", "a.ttf", "-s", "8", "-y", "I", "-r", "65"]);
        assert!(args.comments);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.style, ByteFontType::Italic.value());
        assert_eq!(args.char_range(), 65..256);
        assert_eq!(args.default_file_name(), "a_i_8.bff");
    }

    #[test]
    fn test_style_values() {
        assert_eq!(parse_style("PLAIN"), Ok(1));
        assert_eq!(parse_style("b"), Ok(2));
        assert_eq!(parse_style("Italic"), Ok(4));
        assert_eq!(parse_style("3"), Ok(3));
        assert!(parse_style("0").is_err());
        assert!(parse_style("heavy").is_err());
    }

    #[test]
    fn test_unknown_style_number_uses_i() {
        let args = parse(&["-f", "a.ttf", "-y", "6"]);
        assert_eq!(args.default_file_name(), "a_i_10.bff");
        let args = parse(&["-f", "a.ttf", "-y", "b"]);
        assert_eq!(args.default_file_name(), "a_b_10.bff");
    }

    fn parse_lenient(args: &[&str]) -> Result<(Args, Vec<String>), clap::Error> {
        Args::parse_lenient(std::iter::once("bytefont_gen").chain(args.iter().copied()))
    }

    #[test]
    fn test_invalid_args() {
        assert!(parse_lenient(&[]).is_err());
        assert!(parse_lenient(&["-f", "a.ttf", "-v", "4"]).is_err());
        assert!(parse_lenient(&["-f", "a.ttf", "-s", "0"]).is_err());
        assert!(parse_lenient(&["-f", "a.ttf", "-s", "ten"]).is_err());
        assert!(parse_lenient(&["-f", "a.ttf", "-y", "heavy"]).is_err());
        assert!(parse_lenient(&["-f"]).is_err());
    }

    #[test]
    fn test_unknown_args_are_ignored() {
        let (args, ignored) = parse_lenient(&["--unknown", "-f", "a.ttf", "--dpi=72", "-s", "8", "extra"]).unwrap();
        assert_eq!(args.size, 8);
        assert_eq!(args.font, PathBuf::from("a.ttf"));
        assert_eq!(ignored, vec!["--unknown", "--dpi=72", "extra"]);

        let (args, ignored) = parse_lenient(&["-f", "a.ttf", "-r", "1", "2", "3"]).unwrap();
        assert_eq!(args.char_range(), 1..2);
        assert_eq!(ignored, vec!["3"]);

        let (_, ignored) = parse_lenient(&["-f", "a.ttf"]).unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_out_directory_gets_default_name() {
        let dir = std::env::temp_dir();
        let args = parse(&["-f", "a.ttf", "-o", dir.to_str().unwrap()]);
        assert_eq!(args.output_path(), dir.join("a_p_10.bff"));
    }
}
