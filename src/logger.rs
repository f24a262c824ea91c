// Timezone label localizer, (c) 2022 Georg Brandl.
// Licensed under the GNU AGPL, version 3 or later.

//! Console logger.

use time::OffsetDateTime;
use crate::util::TIME_FMT;

/// Logs our own modules' messages to the console, with a timestamp.
pub struct Logger;

impl log::Log for Logger {
    fn enabled(&self, meta: &log::Metadata) -> bool {
        meta.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        // filter out messages not from our modules
        let path = record.module_path().unwrap_or("");
        if !path.starts_with("tzlabel") {
            return;
        }

        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let stamp = now.format(&TIME_FMT[..]).unwrap_or_default();
        println!("{} {:5}: [{}] {}", stamp, record.level(), path, record.args());
    }

    fn flush(&self) {}
}
