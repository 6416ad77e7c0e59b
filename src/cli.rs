use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "blogharvest",
    version,
    about = "Scrape blog theme listings into a CSV spreadsheet",
    long_about = "Blogharvest pages through a blog platform's theme listing, visits each \
                  post, extracts the title and article body, and writes the results to a \
                  CSV file. Transient network failures are retried with a fixed delay."
)]
pub struct Cli {
    /// Theme directory to crawl
    #[arg(long, default_value_t = 27)]
    pub directory_no: u32,

    /// Active directory sequence of the theme section
    #[arg(long, default_value_t = 3)]
    pub active_directory_seq: u32,

    /// Number of listing pages to walk
    #[arg(long, default_value_t = 1)]
    pub pages: u32,

    /// Output CSV path
    #[arg(short, long, default_value = "output/blog_contents.csv")]
    pub output: PathBuf,

    /// Maximum invocations per post, including the first
    #[arg(long, default_value_t = 10)]
    pub max_attempts: u32,

    /// Pause between retry attempts, in seconds
    #[arg(long, default_value_t = 5)]
    pub retry_delay_secs: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Listing host (overridable for testing against a local server)
    #[arg(
        long,
        env = "BLOGHARVEST_BASE_URL",
        default_value = "https://section.blog.naver.com"
    )]
    pub base_url: String,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_crawl_target() {
        let cli = Cli::parse_from(["blogharvest"]);
        assert_eq!(cli.directory_no, 27);
        assert_eq!(cli.active_directory_seq, 3);
        assert_eq!(cli.pages, 1);
        assert_eq!(cli.max_attempts, 10);
        assert_eq!(cli.retry_delay_secs, 5);
        assert_eq!(cli.base_url, "https://section.blog.naver.com");
    }

    #[test]
    fn knobs_are_overridable() {
        let cli = Cli::parse_from([
            "blogharvest",
            "--pages",
            "3",
            "--max-attempts",
            "2",
            "--output",
            "out/x.csv",
            "-vv",
        ]);
        assert_eq!(cli.pages, 3);
        assert_eq!(cli.max_attempts, 2);
        assert_eq!(cli.output, PathBuf::from("out/x.csv"));
        assert_eq!(cli.verbose, 2);
    }
}
