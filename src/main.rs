use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use folio_pdf::AssetDir;
use folio_pdf::i18n::Language;
use folio_pdf::style::StylePreset;

#[derive(Parser)]
#[command(name = "folio-pdf")]
#[command(about = "Lay out a JSON-described CV as a paginated A4 PDF")]
#[command(version)]
struct Cli {
    /// Assets directory containing json/, i18n/, images/ and fonts/
    assets: PathBuf,
    /// Directory the PDF is written into
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
    /// Display language; detected from LANG when omitted
    #[arg(long, value_enum, env = "FOLIO_LANG")]
    lang: Option<Language>,
    #[arg(long, value_enum, default_value_t = StylePreset::Classic)]
    style: StylePreset,
    /// System font family for English output
    #[arg(long, default_value = "Candara")]
    font_family: String,
    /// Unicode TrueType font for Vietnamese output [default: <ASSETS>/fonts/Roboto_VN.ttf]
    #[arg(long)]
    unicode_font: Option<PathBuf>,
    /// Avatar image [default: <ASSETS>/images/avatar.jpeg]
    #[arg(long, conflicts_with = "no_avatar")]
    avatar: Option<PathBuf>,
    /// Leave the avatar frame out
    #[arg(long)]
    no_avatar: bool,
    /// Drop projects flagged as minor
    #[arg(long)]
    skip_minor: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let assets = AssetDir::new(&cli.assets);
    let mut options = assets.default_options();
    options.language = cli.lang.unwrap_or_else(Language::detect);
    options.style = cli.style;
    options.fonts.latin_family = Some(cli.font_family);
    if let Some(path) = cli.unicode_font {
        options.fonts.unicode_font = Some(path);
        options.fonts.unicode_font_bold = None;
    }
    if cli.no_avatar {
        options.avatar = None;
    } else if let Some(path) = cli.avatar {
        options.avatar = Some(path);
    }
    options.include_minor_projects = !cli.skip_minor;

    match folio_pdf::export_assets(&assets, &options, &cli.output) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
