// SPDX-License-Identifier: MPL-2.0
use goru_frame::app::{self, Flags};

const HELP: &str = "\
goru_frame - place a profile photo inside a circular frame

USAGE:
  goru_frame [OPTIONS] [PHOTO]

OPTIONS:
  --lang <LOCALE>       Interface language (e.g. en-US, bn)
  --config-dir <DIR>    Directory holding settings.toml
  --data-dir <DIR>      Directory for diagnostics reports
  -h, --help            Print this help
";

fn main() -> iced::Result {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{}", HELP);
        return Ok(());
    }

    let flags = Flags {
        lang: args.opt_value_from_str("--lang").ok().flatten(),
        config_dir: args.opt_value_from_str("--config-dir").ok().flatten(),
        data_dir: args.opt_value_from_str("--data-dir").ok().flatten(),
        photo_path: args
            .finish()
            .into_iter()
            .next()
            .and_then(|s| s.into_string().ok()),
    };

    app::run(flags)
}
