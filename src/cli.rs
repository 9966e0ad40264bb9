use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "img-shrink",
    about = "Shrink images by re-encoding them at a chosen quality and format",
    long_about = "img-shrink re-encodes images at a chosen quality, converting PNG to JPEG at low \
                  quality, downscaling anything larger than 2048x2048 and reporting before/after \
                  sizes. Batches run in parallel and report per-file success or failure.",
    version,
    after_help = "EXAMPLES:\n  \
    img-shrink compress photo.png -q 60 -o out\n  \
    img-shrink batch ./images -o out -r -f webp --json\n  \
    img-shrink local a.png b.jpg -o out --delay-ms 0\n  \
    img-shrink info photo.png\n  \
    img-shrink formats --json"
)]
pub struct Args {
    #[arg(short = 'v', long, global = true, help = "Show debug logs")]
    pub verbose: bool,

    #[arg(long, global = true, conflicts_with = "verbose", help = "Only log errors")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Compress a single image file",
        long_about = "Compress one image. The compressed file is written to the output directory \
                      as <name>_compressed.<ext>."
    )]
    Compress {
        #[arg(help = "Input image file path")]
        input: PathBuf,

        #[arg(short = 'o', long, default_value = ".", help = "Output directory")]
        output: PathBuf,

        #[arg(
            short = 'q',
            long,
            help = "Compression quality (1-100, default: 70)",
            long_help = "Compression quality from 1 (lowest) to 100 (highest). \
                         For PNG: >=90 uses Zopfli, >=70 uses high compression, <70 uses standard compression. \
                         Under auto, PNG below 80 is converted to JPEG."
        )]
        quality: Option<u8>,

        #[arg(
            short = 'f',
            long,
            help = "Output format (auto, jpeg, png, webp)",
            long_help = "Force the output format. 'auto' keeps the source format, \
                         except PNG below quality 80 which becomes JPEG."
        )]
        format: Option<String>,

        #[arg(
            short = 'w',
            long,
            help = "Maximum width in pixels (default: 2048)",
            long_help = "Images wider than this are downscaled, preserving aspect ratio."
        )]
        width: Option<u32>,

        #[arg(
            short = 'H',
            long,
            help = "Maximum height in pixels (default: 2048)",
            long_help = "Images taller than this are downscaled, preserving aspect ratio."
        )]
        height: Option<u32>,

        #[arg(long, help = "Print the JSON report instead of the summary")]
        json: bool,

        #[arg(long, requires = "json", help = "Embed the output as a data URI in the JSON report")]
        embed: bool,
    },

    #[command(
        about = "Compress multiple images in parallel",
        long_about = "Process up to the batch limit of images in parallel. \
                      A file that fails to decode is reported and does not stop the others."
    )]
    Batch {
        #[arg(
            help = "Input directory, file pattern, or glob",
            long_help = "Input can be a directory path, file pattern, or glob expression. \
                         Examples: './images', '*.jpg', '/path/to/images/*.png'"
        )]
        input: String,

        #[arg(short = 'o', long, default_value = ".", help = "Output directory")]
        output: PathBuf,

        #[arg(short = 'q', long, help = "Compression quality (1-100, default: 70)")]
        quality: Option<u8>,

        #[arg(short = 'f', long, help = "Output format (auto, jpeg, png, webp)")]
        format: Option<String>,

        #[arg(short = 'w', long, help = "Maximum width in pixels (default: 2048)")]
        width: Option<u32>,

        #[arg(short = 'H', long, help = "Maximum height in pixels (default: 2048)")]
        height: Option<u32>,

        #[arg(
            short = 'j',
            long,
            help = "Number of parallel threads (default: auto)",
            long_help = "Number of threads for parallel batch processing. \
                         If not specified, uses number of CPU cores."
        )]
        threads: Option<usize>,

        #[arg(
            short = 'r',
            long,
            help = "Process subdirectories recursively",
            long_help = "Recursively process all subdirectories when input is a directory."
        )]
        recursive: bool,

        #[arg(
            long = "async",
            help = "Run items as async tasks instead of the thread pool"
        )]
        use_async: bool,

        #[arg(long, help = "Print the JSON report instead of the summary")]
        json: bool,

        #[arg(long, requires = "json", help = "Embed outputs as data URIs in the JSON report")]
        embed: bool,
    },

    #[command(
        about = "Compress files one by one with the raster fallback encoder",
        long_about = "Runs the local fallback path: files are decoded to RGBA, scaled and \
                      re-exported with the built-in encoders, one at a time, then saved as \
                      compressed_<name>.<ext> with a short pause between writes."
    )]
    Local {
        #[arg(required = true, help = "Input image files")]
        inputs: Vec<PathBuf>,

        #[arg(short = 'o', long, default_value = ".", help = "Output directory")]
        output: PathBuf,

        #[arg(short = 'q', long, help = "Compression quality (1-100, default: 70)")]
        quality: Option<u8>,

        #[arg(long, default_value_t = crate::constants::DOWNLOAD_DELAY_MS, help = "Pause between saved files in milliseconds")]
        delay_ms: u64,
    },

    #[command(
        about = "Display image information",
        long_about = "Analyze and display information about an image file including \
                      dimensions, format, file size, and compression suggestions."
    )]
    Info {
        #[arg(help = "Image file path to analyze")]
        input: PathBuf,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    #[command(about = "List supported formats and limits")]
    Formats {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },
}
