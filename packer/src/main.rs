use clap::Parser;
use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use verifier::sign::{dev_anchor_parts, sign_manifest, signed_jwk};
use verifier::{RootKey, Verifier, SCRATCH_BUFFER_SIZE};

#[derive(Parser, Debug)]
#[command(
    name = "packer",
    about = "Sign an update manifest with a two-level JWS chain."
)]
struct Args {
    /// Path to the manifest document
    #[arg(value_name = "MANIFEST")]
    manifest: PathBuf,

    /// PKCS#8 PEM private key of the root that issues the signing key
    #[arg(long, value_name = "PEM")]
    root_key: PathBuf,

    /// Key id the device knows the root key by
    #[arg(long, value_name = "ID")]
    root_kid: String,

    /// PKCS#8 PEM private key that signs the manifest
    #[arg(long, value_name = "PEM")]
    signing_key: PathBuf,

    /// Output file path (defaults to <MANIFEST>.jws)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// A signed manifest plus the anchor a device needs to accept it.
struct Packed {
    jws: String,
    root_n: Vec<u8>,
    root_e: Vec<u8>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let manifest = fs::read(&args.manifest)?;
    let root = load_key(&args.root_key)?;
    let signing = load_key(&args.signing_key)?;

    let packed = pack(&manifest, &root, &args.root_kid, &signing)?;

    let out_path = args
        .out
        .unwrap_or_else(|| default_out_path(&args.manifest));
    fs::write(&out_path, &packed.jws)?;

    println!(
        "✅ signed manifest: kid={} manifest_bytes={} jws_bytes={} -> {}",
        args.root_kid,
        manifest.len(),
        packed.jws.len(),
        out_path.display()
    );
    println!("root n: {}", hex::encode(&packed.root_n));
    println!("root e: {}", hex::encode(&packed.root_e));

    Ok(())
}

fn pack(
    manifest: &[u8],
    root: &RsaPrivateKey,
    root_kid: &str,
    signing: &RsaPrivateKey,
) -> Result<Packed, Box<dyn std::error::Error>> {
    let sjwk = signed_jwk(&signing.to_public_key(), root, root_kid)?;
    let jws = sign_manifest(manifest, signing, &sjwk)?;
    let (root_n, root_e) = dev_anchor_parts(&root.to_public_key());

    // Never write a chain a device with this anchor would reject.
    let anchor = RootKey {
        kid: root_kid.as_bytes(),
        n: &root_n,
        e: &root_e,
    };
    let mut scratch = vec![0u8; SCRATCH_BUFFER_SIZE];
    Verifier::new(anchor)
        .verify_manifest(manifest, &mut jws.clone().into_bytes(), &mut scratch)
        .map_err(to_io_error)?;
    log::debug!("self-check passed for kid `{root_kid}`");

    Ok(Packed {
        jws,
        root_n,
        root_e,
    })
}

fn load_key(path: &Path) -> Result<RsaPrivateKey, io::Error> {
    let pem = fs::read_to_string(path)?;
    RsaPrivateKey::from_pkcs8_pem(&pem).map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}: not a PKCS#8 RSA key: {err}", path.display()),
        )
    })
}

fn default_out_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".jws");
    PathBuf::from(name)
}

fn to_io_error(err: verifier::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("verification error: {err}"))
}
