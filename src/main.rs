use clap::{Parser, Subcommand};
use cubigma::cli::{decrypt_file, encrypt_file, show_info, DecryptOptions, EncryptOptions};
use cubigma::{Alphabet, CipherConfig, CubigmaError, Mode};
use env_logger::Env;
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Version info from build.rs
const VERSION: &str = env!("CUBIGMA_VERSION");
const PROFILE: &str = env!("CUBIGMA_PROFILE");
const GIT_HASH: &str = env!("CUBIGMA_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} ({})", PROFILE, VERSION, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "cubigma")]
#[command(
    author,
    about = "Rotor cipher over a three-dimensional symbol lattice",
    long_about = None
)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Debug logging (RUST_LOG takes precedence for finer control)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a text file into an envelope
    #[command(alias = "e")]
    Encrypt {
        /// Passphrase the key is derived from
        #[arg(long, required = true)]
        passphrase: String,

        /// Base64 salt (random when omitted)
        #[arg(long)]
        salt: Option<String>,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Alphabet file, one symbol per line
        #[arg(long)]
        alphabet: Option<PathBuf>,

        /// Plaintext file
        input: PathBuf,

        /// Envelope file (stdout when omitted)
        output: Option<PathBuf>,
    },

    /// Decrypt an envelope into a text file
    #[command(alias = "d")]
    Decrypt {
        #[arg(long, required = true)]
        passphrase: String,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        alphabet: Option<PathBuf>,

        /// Envelope file
        input: PathBuf,

        /// Plaintext file
        output: PathBuf,
    },

    /// Encrypt or decrypt according to the configuration's mode
    #[command(alias = "r")]
    Run {
        #[arg(long, required = true)]
        passphrase: String,

        #[arg(long, required = true)]
        config: PathBuf,

        #[arg(long)]
        alphabet: Option<PathBuf>,

        input: PathBuf,

        output: PathBuf,
    },

    /// Show information about an envelope
    #[command(alias = "i")]
    Info {
        /// Envelope to inspect
        file: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default));
    builder.format_timestamp(None);
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

fn load_config(path: Option<&Path>) -> Result<CipherConfig, CubigmaError> {
    match path {
        Some(path) => CipherConfig::load(path),
        None => Ok(CipherConfig::default()),
    }
}

fn load_alphabet(path: Option<&Path>) -> Result<Option<Alphabet>, CubigmaError> {
    path.map(Alphabet::load).transpose()
}

fn encrypt(
    passphrase: String,
    salt: Option<String>,
    config: CipherConfig,
    alphabet: Option<Alphabet>,
    input: &Path,
    output: Option<&Path>,
) -> Result<(), CubigmaError> {
    let options = EncryptOptions {
        passphrase,
        salt,
        config,
        alphabet,
    };
    let envelope = encrypt_file(input, output, &options)?;
    match output {
        Some(path) => println!(
            "Encrypted {} symbols into {}",
            envelope.symbol_count(),
            path.display()
        ),
        None => println!("{}", envelope.to_json()?),
    }
    Ok(())
}

fn decrypt(
    passphrase: String,
    config: CipherConfig,
    alphabet: Option<Alphabet>,
    input: &Path,
    output: &Path,
) -> Result<(), CubigmaError> {
    let options = DecryptOptions {
        passphrase,
        config,
        alphabet,
    };
    let written = decrypt_file(input, output, &options)?;
    println!("Decrypted {} symbols to {}", written, output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("cubigma {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            if let Err(e) = Cli::command().print_help() {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            println!();
            return ExitCode::SUCCESS;
        }
    };

    init_logging(cli.verbose);

    let result = match command {
        Commands::Encrypt {
            passphrase,
            salt,
            config,
            alphabet,
            input,
            output,
        } => load_config(config.as_deref()).and_then(|config| {
            let alphabet = load_alphabet(alphabet.as_deref())?;
            encrypt(passphrase, salt, config, alphabet, &input, output.as_deref())
        }),

        Commands::Decrypt {
            passphrase,
            config,
            alphabet,
            input,
            output,
        } => load_config(config.as_deref()).and_then(|config| {
            let alphabet = load_alphabet(alphabet.as_deref())?;
            decrypt(passphrase, config, alphabet, &input, &output)
        }),

        Commands::Run {
            passphrase,
            config,
            alphabet,
            input,
            output,
        } => load_config(Some(&config)).and_then(|config| {
            let alphabet = load_alphabet(alphabet.as_deref())?;
            match config.mode {
                Mode::Encrypt => encrypt(passphrase, None, config, alphabet, &input, Some(&output)),
                Mode::Decrypt => decrypt(passphrase, config, alphabet, &input, &output),
            }
        }),

        Commands::Info { file } => show_info(&file).map(|info| print!("{}", info)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
