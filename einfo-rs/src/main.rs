use std::io::{self, Read, Write};
use std::process;

use tracing_subscriber::EnvFilter;

use einfo::cli::{self, ScriptSource};
use einfo::config::HostConfig;
use einfo::fetch::{CacheFetcher, Fetch, FetchError};
use einfo::script::{Interpreter, RunContext};
use einfo::terminal;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("einfo: {e}");
            eprintln!("{}", cli::USAGE);
            process::exit(2);
        }
    };

    // ── Host config, then command-line overrides ──────────────────────────────
    let mut config = HostConfig::default();
    if let Some(path) = args.config_path() {
        match HostConfig::load_file(&path) {
            Ok((loaded, errors)) => {
                for e in errors {
                    tracing::warn!(path = %path.display(), "{e}");
                }
                config = loaded;
            }
            Err(e) => {
                eprintln!("einfo: {}: {e}", path.display());
                process::exit(1);
            }
        }
    }
    args.apply(&mut config);

    let script = match read_script(&args.script) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("einfo: cannot read script: {e}");
            process::exit(1);
        }
    };

    let fetcher = match build_fetcher(&config) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("einfo: {e}");
            process::exit(1);
        }
    };

    // ── One wake cycle ────────────────────────────────────────────────────────
    let mut interp = Interpreter::new(RunContext::now(config.battery), fetcher);
    interp.run(&script);

    if let Err(e) = report(&mut interp, args.quiet) {
        // silent on a closed pipe
        if e.kind() != io::ErrorKind::BrokenPipe {
            eprintln!("einfo: {e}");
        }
        process::exit(1);
    }
}

fn read_script(source: &ScriptSource) -> io::Result<String> {
    match source {
        ScriptSource::File(path) => std::fs::read_to_string(path),
        ScriptSource::Stdin => {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s)?;
            Ok(s)
        }
    }
}

fn build_fetcher(config: &HostConfig) -> Result<Box<dyn Fetch>, FetchError> {
    let cache = CacheFetcher::new(config.cache_dir.clone());
    if !config.online {
        if config.record {
            tracing::warn!("record has no effect without online");
        }
        return Ok(Box::new(cache));
    }

    #[cfg(feature = "net")]
    {
        use einfo::fetch::{HttpFetcher, RecordingFetcher};

        let live = HttpFetcher::new(std::time::Duration::from_millis(config.timeout_ms))?;
        if config.record {
            return Ok(Box::new(RecordingFetcher::new(live, cache)));
        }
        Ok(Box::new(live))
    }

    #[cfg(not(feature = "net"))]
    {
        tracing::warn!("built without the `net` feature; reading responses from the cache");
        Ok(Box::new(cache))
    }
}

/// Sleep time and both grids on stdout, leftover stack (top first) on stderr.
fn report(interp: &mut Interpreter, quiet: bool) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "Sleep time: {}", interp.sleep_time_us())?;
    writeln!(out, "TEXT:")?;
    terminal::write_text(&mut out, interp.screen(), terminal::stdout_is_tty())?;
    writeln!(out, "ATTR:")?;
    out.write_all(interp.screen().render_attr().as_bytes())?;
    out.flush()?;

    if !quiet {
        let mut err = io::stderr().lock();
        for v in interp.take_stack().iter().rev() {
            err.write_all(v.as_bytes())?;
            err.write_all(b"\n")?;
        }
    }
    Ok(())
}
