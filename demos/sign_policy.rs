use anyhow::{anyhow, Result};
use s3_post_policy::{PolicyConfig, PolicyIssuer};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "sign_policy", about = "An example of PolicyIssuer::sign()")]
struct Opt {
    /// Config file, S3_POST_POLICY env is used if not given
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Secret key, the `sk` in config file is used if not given
    #[structopt(long)]
    secret_key: Option<String>,

    /// Print an HTML upload form instead of JSON
    #[structopt(long)]
    html: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let mut issuer = match &opt.config {
        Some(path) => PolicyIssuer::new(PolicyConfig::load(path)?),
        None => PolicyIssuer::from_env().ok_or_else(|| anyhow!("S3_POST_POLICY is not set"))?,
    };
    let secret_key = opt
        .secret_key
        .or_else(|| issuer.config().secret_key().map(ToOwned::to_owned))
        .ok_or_else(|| anyhow!("Secret key is not given"))?;

    let signed = issuer.sign(&secret_key)?;
    if opt.html {
        print!("{}", signed.to_html_form());
    } else {
        println!("{}", serde_json::to_string_pretty(&signed)?);
    }
    Ok(())
}
