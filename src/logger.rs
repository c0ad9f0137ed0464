use log::LevelFilter;

pub const LOG_FILE: &str = "cv19-chart-current.log";

const OWN_TARGETS: [&str; 3] = ["cv19_chart", "cv19_chart_data", "cv19_chart_feed"];

/// File logging always; stdout too when `debug` is set or in debug builds.
pub fn setup(debug: bool) -> Result<(), fern::InitError> {
    let dir = data::data_path(None);
    std::fs::create_dir_all(&dir)?;

    let own_level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Warn);

    for target in OWN_TARGETS {
        dispatch = dispatch.level_for(target, own_level);
    }

    dispatch = dispatch.chain(fern::log_file(dir.join(LOG_FILE))?);

    if debug || cfg!(debug_assertions) {
        dispatch = dispatch.chain(std::io::stdout());
    }

    dispatch.apply()?;
    Ok(())
}
