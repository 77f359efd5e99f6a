/// Reads numbers from stdin, one per line, and writes a serialized histogram to stdout.
///
/// Unlike `cli.rs`, this takes its bounds from `std::env::args` directly rather than through
/// `clap`, to illustrate that the serialization API has no dependency on any particular argument
/// parser.
#[cfg(feature = "serialization")]
fn main() {
    example::run()
}

#[cfg(not(feature = "serialization"))]
fn main() {
    eprintln!("serialization is disabled");
}

#[cfg(feature = "serialization")]
mod example {
    use std::io::BufRead;

    use hdr_histogram_core::serialization::{V2DeflateSerializer, V2Serializer};
    use hdr_histogram_core::Histogram;

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let min: u64 = args.next().map_or(1, |s| s.parse().expect("min must be a u64"));
        let max: u64 = args
            .next()
            .map_or(u64::max_value(), |s| s.parse().expect("max must be a u64"));
        let sigfig: u8 = args.next().map_or(3, |s| s.parse().expect("sigfig must be a u8"));
        let compression = args.next().as_deref() == Some("compressed");

        let mut h: Histogram<u64> = Histogram::new_with_bounds(min, max, sigfig).unwrap();

        let stdin = std::io::stdin();
        let stdin_handle = stdin.lock();

        for num in stdin_handle
            .lines()
            .map(|l| l.expect("should be able to read stdin"))
            .map(|s| s.parse().expect("each line must be a u64"))
        {
            h.record(num).unwrap();
        }

        let stdout = std::io::stdout();
        let mut stdout_handle = stdout.lock();

        if compression {
            V2DeflateSerializer::new()
                .serialize(&h, &mut stdout_handle)
                .unwrap();
        } else {
            V2Serializer::new().serialize(&h, &mut stdout_handle).unwrap();
        }
    }
}
