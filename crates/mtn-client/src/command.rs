//! mtn command line construction.

use std::path::{Path, PathBuf};

use mtn_models::{Shadow, ThumbnailOptions};

/// Builder for mtn argument vectors.
#[derive(Debug, Clone)]
pub struct MtnCommand {
    /// Input video (or directory) path
    input: PathBuf,
    /// Flags and values, in emit order
    args: Vec<String>,
}

impl MtnCommand {
    /// Create a command with no options for the given input.
    pub fn new(input: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Build a command from generation options.
    pub fn from_options(input: impl AsRef<Path>, opts: &ThumbnailOptions) -> Self {
        let mut cmd = Self::new(input);

        // Output
        cmd.value_if_set("-O", &opts.output_dir);
        cmd.value_if_set("-o", &opts.output_suffix);
        cmd.flag_if("-X", opts.use_full_filename);
        cmd.value_if_set("-x", &opts.custom_filename);
        cmd.flag_if("-W", opts.no_overwrite);

        // Grid. rows and width accept an explicit 0.
        cmd.value_if_set("-c", &opts.columns);
        cmd.value_if_present("-r", &opts.rows);
        cmd.value_if_set("-s", &opts.step);
        cmd.value_if_set("-h", &opts.min_height);
        cmd.value_if_present("-w", &opts.width);
        cmd.value_if_set("-g", &opts.gap);

        // Appearance
        cmd.value_if_set("-f", &opts.font);
        cmd.value_if_set("-k", &opts.background_color);
        cmd.value_if_set("-j", &opts.jpeg_quality);
        cmd.flag_if("-i", opts.show_info == Some(false));
        cmd.flag_if("-t", opts.show_timestamp == Some(false));
        cmd.value_if_set("-T", &opts.additional_text);

        // Detection
        cmd.value_if_set("-D", &opts.edge_detection);
        cmd.value_if_set("-b", &opts.blank_threshold);

        // Timing
        cmd.value_if_set("-B", &opts.skip_beginning);
        cmd.value_if_set("-E", &opts.skip_end);
        cmd.value_if_set("-C", &opts.cut_duration);

        // Streams
        cmd.value_if_present("-S", &opts.video_stream);

        // Modes
        cmd.flag_if("-v", opts.verbose);
        cmd.flag_if("-q", opts.quiet);
        cmd.flag_if("-z", opts.seek_mode);
        cmd.flag_if("-Z", opts.non_seek_mode);

        // Advanced
        cmd.value_if_set("-a", &opts.aspect_ratio);
        match opts.shadow {
            Some(Shadow::Radius(radius)) => cmd.push_pair("--shadow", radius.to_string()),
            // mtn reads an empty value as "default radius"
            Some(Shadow::Enabled(true)) => cmd.push_pair("--shadow", String::new()),
            Some(Shadow::Enabled(false)) | None => {}
        }
        cmd.flag_if("--transparent", opts.transparent);
        cmd.flag_if("--cover", opts.extract_cover);
        cmd.value_if_set("--vtt", &opts.web_vtt);
        cmd.value_if_set("--filters", &opts.filters);
        cmd.flag_if("--tonemap", opts.tonemap);

        // Directory
        cmd.value_if_present("-d", &opts.depth);
        if let Some(extensions) = &opts.extensions {
            cmd.push_pair("-e", extensions.join(","));
        }

        // Individual shots
        if let Some(shots) = &opts.save_individual {
            if shots.any() {
                cmd.push_pair("-I", shots.codes());
            }
        }

        // Info file
        cmd.value_if_set("-N", &opts.info_suffix);

        cmd
    }

    /// Add a bare flag.
    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.args.push(flag.into());
        self
    }

    /// Input path, which always goes last on the command line.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(self.input.to_string_lossy().to_string());
        args
    }

    fn push_pair(&mut self, flag: impl Into<String>, value: impl Into<String>) {
        self.args.push(flag.into());
        self.args.push(value.into());
    }

    fn flag_if(&mut self, flag: &str, enabled: bool) {
        if enabled {
            self.args.push(flag.to_string());
        }
    }

    /// Emit `flag value` when the value is present and non-zero/non-empty.
    fn value_if_set<T: ArgValue>(&mut self, flag: &str, value: &Option<T>) {
        if let Some(v) = value.as_ref().filter(|v| v.is_set()) {
            self.push_pair(flag, v.render());
        }
    }

    /// Emit `flag value` whenever the value is present, zero included.
    fn value_if_present<T: ArgValue>(&mut self, flag: &str, value: &Option<T>) {
        if let Some(v) = value {
            self.push_pair(flag, v.render());
        }
    }
}

/// Option values that can be rendered as a single mtn argument.
trait ArgValue {
    /// False for zero, NaN and empty strings.
    fn is_set(&self) -> bool;
    fn render(&self) -> String;
}

impl ArgValue for u32 {
    fn is_set(&self) -> bool {
        *self != 0
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl ArgValue for i32 {
    fn is_set(&self) -> bool {
        *self != 0
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl ArgValue for f64 {
    fn is_set(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl ArgValue for String {
    fn is_set(&self) -> bool {
        !self.is_empty()
    }

    fn render(&self) -> String {
        self.clone()
    }
}

/// Arguments for a generation run.
pub fn build_arguments(video_path: impl AsRef<Path>, opts: &ThumbnailOptions) -> Vec<String> {
    MtnCommand::from_options(video_path, opts).build_args()
}

/// Arguments for the verbose metadata query.
pub fn metadata_arguments(video_path: impl AsRef<Path>) -> Vec<String> {
    MtnCommand::new(video_path).flag("-v").flag("-i").build_args()
}

/// Arguments for the availability and version probes. mtn prints its banner
/// and exits because no input file is given.
pub fn version_arguments() -> Vec<String> {
    vec!["-v".to_string()]
}
