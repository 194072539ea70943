use clap::Parser;
use std::fs;
use std::io;
use std::path::PathBuf;
use verifier::{RootKey, Verifier, SCRATCH_BUFFER_SIZE};

#[derive(Parser, Debug)]
#[command(
    name = "host-demo",
    about = "Check a manifest against its detached JWS the way a device does."
)]
struct Args {
    /// Path to the manifest document
    manifest: PathBuf,

    /// Path to the detached JWS
    jws: PathBuf,

    /// Key id of a development root key (defaults to the production anchor)
    #[arg(long, value_name = "ID", requires = "root_n_hex")]
    root_kid: Option<String>,

    /// Hex-encoded modulus of the development root key
    #[arg(long, value_name = "HEX", requires = "root_kid")]
    root_n_hex: Option<String>,

    /// Hex-encoded public exponent of the development root key
    #[arg(long, value_name = "HEX", default_value = "010001")]
    root_e_hex: String,
}

/// Root key given on the command line.
struct DevAnchor {
    kid: String,
    n: Vec<u8>,
    e: Vec<u8>,
}

impl DevAnchor {
    fn root_key(&self) -> RootKey<'_> {
        RootKey {
            kid: self.kid.as_bytes(),
            n: &self.n,
            e: &self.e,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let manifest = fs::read(&args.manifest)?;
    let mut jws = fs::read(&args.jws)?;
    while jws.last().is_some_and(u8::is_ascii_whitespace) {
        jws.pop();
    }

    let kid = verify_files(&args, &manifest, &mut jws)?;

    println!(
        "✅ manifest authenticated: anchor=`{}` manifest_bytes={} -> {}",
        kid,
        manifest.len(),
        args.manifest.display()
    );

    Ok(())
}

/// Runs the full chain check and returns the anchor id it ended at.
fn verify_files(
    args: &Args,
    manifest: &[u8],
    jws: &mut [u8],
) -> Result<String, Box<dyn std::error::Error>> {
    let dev = dev_anchor(args)?;
    let anchor = match &dev {
        Some(dev) => dev.root_key(),
        None => *verifier::root_key(),
    };

    let mut scratch = vec![0u8; SCRATCH_BUFFER_SIZE];
    Verifier::new(anchor)
        .verify_manifest(manifest, jws, &mut scratch)
        .map_err(to_io_error)?;

    Ok(String::from_utf8_lossy(anchor.kid).into_owned())
}

fn dev_anchor(args: &Args) -> Result<Option<DevAnchor>, Box<dyn std::error::Error>> {
    let (Some(kid), Some(n_hex)) = (args.root_kid.as_deref(), args.root_n_hex.as_deref()) else {
        if args.root_kid.is_some() || args.root_n_hex.is_some() {
            return Err("root_kid and root_n_hex must be given together".into());
        }
        return Ok(None);
    };

    Ok(Some(DevAnchor {
        kid: kid.to_string(),
        n: parse_hex("root_n_hex", n_hex)?,
        e: parse_hex("root_e_hex", &args.root_e_hex)?,
    }))
}

fn parse_hex(name: &str, hex: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let bytes = hex::decode(hex.trim()).map_err(|_| format!("{name} not valid hex"))?;
    if bytes.is_empty() {
        return Err(format!("{name} must not be empty").into());
    }
    Ok(bytes)
}

fn to_io_error(err: verifier::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("manifest rejected: {err}"))
}
