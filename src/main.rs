use fastq_filter::{
    filter_fastq, AverageErrorRateFilter, FilterChain, MaxLengthFilter, MedianQualityFilter,
    MinLengthFilter, DEFAULT_COMPRESSION_LEVEL, DEFAULT_PHRED_OFFSET, MAX_PHRED,
};
use std::process;
use std::str::FromStr;

struct Config {
    inputs: Vec<String>,
    outputs: Vec<String>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    average_error_rate: Option<f64>,
    mean_quality: Option<f64>,
    median_quality: Option<f64>,
    compression_level: u32,
    phred_offset: u8,
}

fn usage(program: &str) {
    eprintln!("Usage: {} [options] <input.fastq[.gz]>...", program);
    eprintln!("\nFilter FASTQ files on quality and length metrics.");
    eprintln!("Use - to read from stdin. Multiple inputs are filtered in sync.");
    eprintln!("\nOptions:");
    eprintln!("  -o, --output <file>            Output file, repeat once per input.");
    eprintln!("                                 Use .gz for compressed output. Default: -");
    eprintln!("  -l, --min-length <n>           Minimum read length");
    eprintln!("  -L, --max-length <n>           Maximum read length");
    eprintln!("  -e, --average-error-rate <f>   Maximum average per-base error rate");
    eprintln!("  -q, --mean-quality <n>         Same as -e but as a phred score,");
    eprintln!("                                 -q 30 equals -e 0.001");
    eprintln!("  -Q, --median-quality <n>       Minimum median phred score");
    eprintln!(
        "  -c, --compression-level <n>    Gzip level for .gz outputs. Default: {}",
        DEFAULT_COMPRESSION_LEVEL
    );
    eprintln!(
        "      --phred-offset <n>         Phred score offset. Default: {}",
        DEFAULT_PHRED_OFFSET
    );
}

fn parse_number<T: FromStr>(flag: &str, value: Option<String>) -> T {
    let text = value.unwrap_or_else(|| {
        eprintln!("error: {} requires a value", flag);
        process::exit(2);
    });
    text.parse().unwrap_or_else(|_| {
        eprintln!("error: invalid value '{}' for {}", text, flag);
        process::exit(2);
    })
}

fn parse_args() -> Config {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "fastq-filter".to_string());

    let mut config = Config {
        inputs: Vec::new(),
        outputs: Vec::new(),
        min_length: None,
        max_length: None,
        average_error_rate: None,
        mean_quality: None,
        median_quality: None,
        compression_level: DEFAULT_COMPRESSION_LEVEL,
        phred_offset: DEFAULT_PHRED_OFFSET,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                usage(&program);
                process::exit(0);
            }
            "-o" | "--output" => match args.next() {
                Some(path) => config.outputs.push(path),
                None => {
                    eprintln!("error: {} requires a value", arg);
                    process::exit(2);
                }
            },
            "-l" | "--min-length" => config.min_length = Some(parse_number(&arg, args.next())),
            "-L" | "--max-length" => config.max_length = Some(parse_number(&arg, args.next())),
            "-e" | "--average-error-rate" => {
                config.average_error_rate = Some(parse_number(&arg, args.next()))
            }
            "-q" | "--mean-quality" => config.mean_quality = Some(parse_number(&arg, args.next())),
            "-Q" | "--median-quality" => {
                config.median_quality = Some(parse_number(&arg, args.next()))
            }
            "-c" | "--compression-level" => {
                config.compression_level = parse_number(&arg, args.next())
            }
            "--phred-offset" => config.phred_offset = parse_number(&arg, args.next()),
            other if other.starts_with('-') && other != "-" => {
                eprintln!("error: unknown option '{}'", other);
                usage(&program);
                process::exit(2);
            }
            _ => config.inputs.push(arg),
        }
    }

    if config.inputs.is_empty() {
        usage(&program);
        process::exit(2);
    }
    if config.phred_offset > MAX_PHRED {
        eprintln!(
            "error: --phred-offset must be at most {}, got {}",
            MAX_PHRED, config.phred_offset
        );
        process::exit(2);
    }
    if config.outputs.is_empty() {
        config.outputs.push("-".to_string());
    }

    config
}

/// Filters are ordered from low cost to high cost so that cheap length
/// checks short-circuit before any quality statistics are computed.
fn build_chain(config: &Config) -> FilterChain {
    let mut chain = FilterChain::new();
    if let Some(threshold) = config.min_length {
        chain.push(Box::new(MinLengthFilter::new(threshold)));
    }
    if let Some(threshold) = config.max_length {
        chain.push(Box::new(MaxLengthFilter::new(threshold)));
    }
    if let Some(threshold) = config.average_error_rate {
        chain.push(Box::new(AverageErrorRateFilter::with_offset(
            threshold,
            config.phred_offset,
        )));
    }
    if let Some(quality) = config.mean_quality {
        let threshold = 10f64.powf(-quality / 10.0);
        chain.push(Box::new(AverageErrorRateFilter::with_offset(
            threshold,
            config.phred_offset,
        )));
    }
    if let Some(threshold) = config.median_quality {
        chain.push(Box::new(MedianQualityFilter::with_offset(
            threshold,
            config.phred_offset,
        )));
    }
    chain
}

fn main() {
    let config = parse_args();
    let mut chain = build_chain(&config);

    match filter_fastq(
        &config.inputs,
        &config.outputs,
        &mut chain,
        config.compression_level,
    ) {
        Ok(summary) => {
            chain.print_summary();
            eprintln!(
                "Record groups: {} / {} written",
                summary.groups_written, summary.groups_seen
            );
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
