use anyhow::Context;
use num_bigint::BigInt;
use secret_reconstruction::{
    record::ShareRecord,
    sharing::{ReconstructionRequest, reconstruct},
};

const DEFAULT_FILES: &str = "demos/testcase1.json,demos/testcase2.json";

// This binary reconstructs the secret of every share record file it is given
// and prints it in decimal.
// Run via
// ```
// cargo run --bin reconstruct_files -- files=<path1,path2,...>
// ```
fn main() -> Result<(), anyhow::Error> {
    let files = parse_files(std::env::args());
    if files.is_empty() {
        return Err(anyhow::anyhow!(
            "files argument cannot be empty, e.g., files={DEFAULT_FILES}"
        ));
    }

    for file in files {
        let secret = reconstruct_file(&file)?;
        println!("Secret for {file}: {secret}");
    }

    Ok(())
}

fn parse_files(args: impl IntoIterator<Item = String>) -> Vec<String> {
    args.into_iter()
        .find(|arg| arg.starts_with("files="))
        .map(|arg| arg.trim_start_matches("files=").to_string())
        .unwrap_or_else(|| DEFAULT_FILES.to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn reconstruct_file(file: &str) -> Result<BigInt, anyhow::Error> {
    let content = std::fs::read_to_string(file).with_context(|| format!("reading {file}"))?;
    let record: ShareRecord =
        serde_json::from_str(&content).with_context(|| format!("parsing {file}"))?;
    let request =
        ReconstructionRequest::try_from(record).with_context(|| format!("loading {file}"))?;
    reconstruct(&request).with_context(|| format!("reconstructing secret of {file}"))
}
