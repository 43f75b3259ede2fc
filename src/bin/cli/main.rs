use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use object_gateway::{
    adapters::inbound::http::dto::ListVersionsResultDto,
    domain::models::{CAPACITY_XML_SUFFIX, SYSTEM_XML_SUFFIX},
};

#[derive(Parser, Debug)]
#[command(name = "object-gateway-cli")]
#[command(about = "CLI for interacting with the object gateway", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(short, long, env = "OBJECT_GATEWAY_URL", default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List object versions and delete markers in a bucket
    Versions {
        /// Bucket name
        bucket: String,
        #[arg(short, long)]
        prefix: Option<String>,
        #[arg(short, long)]
        delimiter: Option<String>,
        /// Entries per page
        #[arg(long)]
        max_keys: Option<u32>,
        /// Follow next markers until the listing is complete
        #[arg(long)]
        all: bool,
        /// Print raw pages as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch the capacity.xml document
    Capacity {
        /// Bucket name
        bucket: String,
        /// Key prefix the backup repository lives under
        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Fetch the system.xml document
    SystemInfo {
        /// Bucket name
        bucket: String,
        /// Key prefix the backup repository lives under
        #[arg(short, long)]
        prefix: Option<String>,
    },
}

struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn list_versions(
        &self,
        bucket: &str,
        params: &[(&str, String)],
    ) -> Result<ListVersionsResultDto> {
        let mut query = vec![("versions", String::new())];
        query.extend(params.iter().cloned());

        let response = self
            .http
            .get(format!("{}/{}", self.base_url, bucket))
            .query(&query)
            .send()
            .await
            .context("Request failed")?;

        let status = response.status();
        let body = response.text().await.context("Failed to read response")?;
        if !status.is_success() {
            bail!("Server returned {}: {}", status, body);
        }

        ListVersionsResultDto::from_xml(&body).context("Malformed version listing")
    }

    async fn get_text(&self, bucket: &str, key: &str) -> Result<String> {
        let response = self
            .http
            .get(format!("{}/{}/{}", self.base_url, bucket, key))
            .send()
            .await
            .context("Request failed")?;

        let status = response.status();
        let body = response.text().await.context("Failed to read response")?;
        if !status.is_success() {
            bail!("Server returned {}: {}", status, body);
        }
        Ok(body)
    }
}

fn synthetic_key(prefix: Option<&str>, suffix: &str) -> String {
    match prefix.map(|p| p.trim_end_matches('/')).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{}/{}", prefix, suffix),
        None => suffix.to_string(),
    }
}

fn print_page(page: &ListVersionsResultDto) {
    for version in &page.versions {
        println!(
            "{:<8} {:<40} {:<34} {:>12} {}",
            if version.is_latest { "LATEST" } else { "" },
            version.key,
            version.version_id,
            version.size,
            version.last_modified
        );
    }
    for marker in &page.delete_markers {
        println!(
            "{:<8} {:<40} {:<34} {:>12} {}",
            if marker.is_latest { "DELETED" } else { "marker" },
            marker.key,
            marker.version_id,
            "-",
            marker.last_modified
        );
    }
    for prefix in &page.common_prefixes {
        println!("{:<8} {}", "PRE", prefix.prefix);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = GatewayClient::new(&cli.url);

    match cli.command {
        Commands::Versions {
            bucket,
            prefix,
            delimiter,
            max_keys,
            all,
            json,
        } => {
            let mut params: Vec<(&str, String)> = Vec::new();
            if let Some(prefix) = prefix {
                params.push(("prefix", prefix));
            }
            if let Some(delimiter) = delimiter {
                params.push(("delimiter", delimiter));
            }
            if let Some(max_keys) = max_keys {
                params.push(("max-keys", max_keys.to_string()));
            }

            let mut cursor: Option<(String, String)> = None;
            loop {
                let mut page_params = params.clone();
                if let Some((key_marker, version_id_marker)) = cursor.take() {
                    page_params.push(("key-marker", key_marker));
                    page_params.push(("version-id-marker", version_id_marker));
                }

                let page = client.list_versions(&bucket, &page_params).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&page)?);
                } else {
                    print_page(&page);
                }

                match (page.is_truncated, page.next_key_marker, page.next_version_id_marker) {
                    (true, Some(key_marker), Some(version_id_marker)) if all => {
                        cursor = Some((key_marker, version_id_marker));
                    }
                    (true, ..) if !all => {
                        eprintln!("(truncated, pass --all to fetch every page)");
                        break;
                    }
                    _ => break,
                }
            }
        }
        Commands::Capacity { bucket, prefix } => {
            let key = synthetic_key(prefix.as_deref(), CAPACITY_XML_SUFFIX);
            println!("{}", client.get_text(&bucket, &key).await?);
        }
        Commands::SystemInfo { bucket, prefix } => {
            let key = synthetic_key(prefix.as_deref(), SYSTEM_XML_SUFFIX);
            println!("{}", client.get_text(&bucket, &key).await?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_key_joins_prefix() {
        assert_eq!(synthetic_key(None, SYSTEM_XML_SUFFIX), SYSTEM_XML_SUFFIX);
        assert_eq!(
            synthetic_key(Some("veeam/"), CAPACITY_XML_SUFFIX),
            format!("veeam/{}", CAPACITY_XML_SUFFIX)
        );
    }

    #[test]
    fn test_versions_arguments() {
        let cli = Cli::parse_from([
            "object-gateway-cli",
            "versions",
            "b",
            "--max-keys",
            "50",
            "--all",
        ]);
        match cli.command {
            Commands::Versions {
                bucket,
                max_keys,
                all,
                ..
            } => {
                assert_eq!(bucket, "b");
                assert_eq!(max_keys, Some(50));
                assert!(all);
            }
            _ => panic!("Expected versions command"),
        }
    }
}
