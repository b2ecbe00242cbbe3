use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use huffman_text::{compress, decode, format_bits, parse_bits, CodeTable, CodeToSymbol, CodeTree, HuffmanCodec};
use log::{debug, error, info, LevelFilter};

/// Huffman encoder and decoder for text and files.
#[derive(Debug, Parser)]
#[clap(name = "huffman-text", author, version, about, long_about = None)]
struct Args {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Print the code table and the bit-string for TEXT (or stdin)
    Encode {
        text: Option<String>,

        /// Write the code table to this file instead of stdout
        #[clap(short, long)]
        table: Option<PathBuf>,
    },

    /// Decode a bit-string of 0s and 1s using a table written by `encode`
    Decode {
        /// Code table file
        #[clap(short, long, env = "HUFFMAN_TEXT_TABLE")]
        table: PathBuf,

        /// Bit-string to decode; read from stdin when absent
        bits: Option<String>,
    },

    /// Compress a file into a self-describing container
    Compress { input: PathBuf, output: PathBuf },

    /// Restore a file written by `compress`
    Decompress { input: PathBuf, output: PathBuf },

    /// Print the code tree built for TEXT (or stdin)
    Tree { text: Option<String> },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.parse_default_env();
    builder.format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()));
    builder.init();
}

fn read_text(text: Option<String>) -> io::Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            // drop the newline a shell pipe appends
            if buf.ends_with('\n') {
                buf.pop();
                if buf.ends_with('\r') {
                    buf.pop();
                }
            }
            Ok(buf)
        }
    }
}

/// One entry per line: `<code>\tU+<scalar hex>\t<escaped symbol>`. The last
/// column is informational only.
fn write_table<W: Write>(writer: &mut W, table: &CodeTable<char>) -> io::Result<()> {
    for (symbol, code) in table.sorted() {
        writeln!(
            writer,
            "{}\tU+{:04X}\t{}",
            format_bits(code),
            *symbol as u32,
            symbol.escape_default()
        )?;
    }
    Ok(())
}

fn read_table(path: &Path) -> Result<CodeToSymbol<char>, Box<dyn Error>> {
    let contents = fs::read_to_string(path)?;
    let inverse = parse_table(&contents, &path.display().to_string())?;
    debug!("loaded {} codes from {}", inverse.len(), path.display());
    Ok(inverse)
}

/// Parses the format written by [`write_table`]. `origin` prefixes error
/// messages.
fn parse_table(contents: &str, origin: &str) -> Result<CodeToSymbol<char>, Box<dyn Error>> {
    let mut inverse = CodeToSymbol::new();

    for (lineno, line) in contents.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
        let mut fields = line.split('\t');
        let (Some(code), Some(scalar)) = (fields.next(), fields.next()) else {
            return Err(format!("{}:{}: expected `<code>\\tU+<hex>`", origin, lineno + 1).into());
        };
        let code = parse_bits(code)?;
        let symbol = scalar
            .strip_prefix("U+")
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32)
            .ok_or_else(|| format!("{}:{}: bad symbol {:?}", origin, lineno + 1, scalar))?;

        if code.is_empty() || inverse.insert(code, symbol).is_some() {
            return Err(format!("{}:{}: empty or duplicate code", origin, lineno + 1).into());
        }
    }
    Ok(inverse)
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout();
    let mut stdout = BufWriter::new(stdout.lock());

    match args.mode {
        Mode::Encode { text, table } => {
            let text = read_text(text)?;
            let (bits, codes) = compress(&text)?;
            info!(
                "{} chars, {} distinct, {} bits (vs {} at 8 bits/char)",
                text.chars().count(),
                codes.len(),
                bits.len(),
                text.chars().count() * 8
            );
            match table {
                Some(path) => {
                    let mut file = BufWriter::new(File::create(&path)?);
                    write_table(&mut file, &codes)?;
                    file.flush()?;
                }
                None => {
                    write_table(&mut stdout, &codes)?;
                    writeln!(stdout)?;
                }
            }
            writeln!(stdout, "{}", format_bits(&bits))?;
        }
        Mode::Decode { table, bits } => {
            let inverse = read_table(&table)?;
            let bits = parse_bits(read_text(bits)?.trim())?;
            let text: String = decode(&bits, &inverse)?.into_iter().collect();
            writeln!(stdout, "{}", text)?;
        }
        Mode::Compress { input, output } => {
            let reader = BufReader::new(File::open(&input)?);
            let writer = BufWriter::new(File::create(&output)?);
            HuffmanCodec::<u8>::encode_from_reader(reader, writer)?;
        }
        Mode::Decompress { input, output } => {
            let reader = BufReader::new(File::open(&input)?);
            let writer = BufWriter::new(File::create(&output)?);
            HuffmanCodec::<u8>::decode_from_reader(reader, writer)?;
        }
        Mode::Tree { text } => {
            let text = read_text(text)?;
            let tree = CodeTree::try_from(text.as_str())?;
            write!(stdout, "{}", tree)?;
        }
    }

    stdout.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn table_file_roundtrip() {
        let text = "tab\there, newline\nthere ☕";
        let (bits, codes) = compress(text).unwrap();

        let mut written = Vec::new();
        write_table(&mut written, &codes).unwrap();
        let written = String::from_utf8(written).unwrap();
        assert_eq!(written.lines().count(), codes.len());

        let inverse = parse_table(&written, "table").unwrap();
        assert_eq!(&inverse, codes.decoder());
        let decoded: String = decode(&bits, &inverse).unwrap().into_iter().collect();
        assert_eq!(decoded, text);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let inverse = parse_table("0\tU+0061\ta\n\n1\tU+0062\tb\n", "table").unwrap();
        assert_eq!(inverse.len(), 2);
        assert_eq!(inverse.get(&parse_bits("1").unwrap()), Some(&'b'));
    }

    #[test_case("0\tU+0061\ta\n0\tU+0062\tb" ; "duplicate code")]
    #[test_case("\tU+0061\ta" ; "empty code")]
    #[test_case("0\tU+ZZZZ\ta" ; "bad scalar")]
    #[test_case("0\tU+D800\t?" ; "surrogate scalar")]
    #[test_case("0\t0061\ta" ; "missing prefix")]
    #[test_case("01" ; "missing field")]
    #[test_case("0x\tU+0061\ta" ; "bad bit marker")]
    fn malformed_tables_are_rejected(contents: &str) {
        assert!(parse_table(contents, "table").is_err());
    }

    #[test]
    fn errors_name_the_line() {
        let err = parse_table("0\tU+0061\ta\n1\tnope\tb", "codes.tsv").unwrap_err();
        assert!(err.to_string().starts_with("codes.tsv:2:"));
    }
}
