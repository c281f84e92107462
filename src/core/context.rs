use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result, anyhow};
use rayon::prelude::*;

use crate::{
    cli::args::CommonArgs,
    config::{Config, TargetConfig, load_config},
    core::{
        catalog::{CatalogEntry, build_catalog, read_catalog},
        data::LocalizableString,
        diagnostics::Diagnostics,
        disassembler::{CommandDisassembler, Disassembler},
        extract::{IlExtractor, MarkupExtractor, SourceExtractor},
        file_scanner::{FileClassifier, FileKind, scan_files},
    },
};

/// Everything one target produced.
pub struct TargetOutcome {
    /// Catalog path, resolved against the project root.
    pub output: PathBuf,
    /// Number of files scanned, per kind.
    pub files: BTreeMap<FileKind, usize>,
    /// Records extracted, before de-duplication.
    pub records_found: usize,
    /// The merged, sorted and normalized catalog, ready to be written.
    pub catalog: Vec<CatalogEntry>,
    pub diagnostics: Diagnostics,
}

impl TargetOutcome {
    pub fn file_count(&self) -> usize {
        self.files.values().sum()
    }
}

/// Configured extraction engine for one project.
///
/// Holds the loaded configuration and one extractor per input kind. All
/// methods take `&self`, so a context is shared freely across the worker
/// threads that extract files in parallel.
pub struct ExtractContext {
    pub config: Config,
    /// Directory that sources and outputs are resolved against.
    pub root_dir: PathBuf,
    /// True if the configuration came from a `.locxrc.json` file.
    pub from_file: bool,
    pub verbose: bool,
    classifier: FileClassifier,
    source: SourceExtractor,
    markup: MarkupExtractor,
    il: IlExtractor,
    disassembler: Option<Box<dyn Disassembler>>,
}

impl ExtractContext {
    /// Load the configuration found from `--root` (or the current directory).
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let start = common_args
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let loaded = load_config(&start)?;

        let mut ctx = Self::from_config(loaded.config, loaded.base_dir)?;
        ctx.from_file = loaded.from_file;
        ctx.verbose = common_args.verbose;
        Ok(ctx)
    }

    pub fn from_config(config: Config, root_dir: PathBuf) -> Result<Self> {
        let markers = &config.markers;
        let source = SourceExtractor::from_config(markers);
        let markup = MarkupExtractor::new(&markers.markup_extension).with_context(|| {
            format!("Invalid markup extension name: {:?}", markers.markup_extension)
        })?;
        let il = IlExtractor::new(&markers.il_one_arg, &markers.il_two_arg);

        let disassembler = config
            .disassembler
            .as_ref()
            .map(|d| Box::new(CommandDisassembler::from_config(d)) as Box<dyn Disassembler>);
        let mut classifier = FileClassifier::from_config(&config);
        if disassembler.is_none() {
            classifier = classifier.without_binaries();
        }

        Ok(Self {
            config,
            root_dir,
            from_file: false,
            verbose: false,
            classifier,
            source,
            markup,
            il,
            disassembler,
        })
    }

    /// Replace the configured disassembler; binaries are scanned from now on.
    pub fn with_disassembler(mut self, disassembler: Box<dyn Disassembler>) -> Self {
        self.classifier = FileClassifier::from_config(&self.config);
        self.disassembler = Some(disassembler);
        self
    }

    /// Kind of `path` according to the configured extensions.
    pub fn classify(&self, path: &Path) -> Option<FileKind> {
        self.classifier.classify(path)
    }

    /// Extract the records of one file.
    ///
    /// Per-occurrence problems go to `diagnostics`; only failing to read or
    /// disassemble the file is an error.
    pub fn extract_file(
        &self,
        path: &Path,
        kind: FileKind,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<LocalizableString>> {
        match kind {
            FileKind::Source => Ok(self.source.extract_str(&read_text(path)?, diagnostics)),
            FileKind::Markup => Ok(self.markup.extract(&read_text(path)?, diagnostics)),
            FileKind::Binary => {
                let disassembler = self
                    .disassembler
                    .as_ref()
                    .ok_or_else(|| anyhow!("No disassembler configured for {}", path.display()))?;
                let lines = disassembler.disassemble(path)?;
                Ok(self.il.extract(&lines, diagnostics))
            }
        }
    }

    /// Extract from a disassembly listing that is already on disk.
    pub fn extract_listing(
        &self,
        path: &Path,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<LocalizableString>> {
        let text = read_text(path)?;
        let lines: Vec<&str> = text.lines().collect();
        Ok(self.il.extract(&lines, diagnostics))
    }

    /// Scan, extract and merge one target into its catalog.
    ///
    /// Files are extracted in parallel, each into its own diagnostics sink;
    /// records and diagnostics are merged back in path order.
    pub fn run_target(&self, target: &TargetConfig) -> Result<TargetOutcome> {
        let output = self.root_dir.join(&target.output);
        let mut diagnostics = Diagnostics::new();
        diagnostics.info(format!("STARTING {}", output.display()));

        let ignores: Vec<String> = self
            .config
            .ignores
            .iter()
            .chain(&target.ignores)
            .cloned()
            .collect();
        let scan = scan_files(
            &self.root_dir,
            &target.sources,
            &ignores,
            &self.classifier,
            &mut diagnostics,
        );
        if scan.skipped_count > 0 {
            diagnostics.warning(format!("{} path(s) could not be read", scan.skipped_count));
        }

        let results: Vec<(Vec<LocalizableString>, Diagnostics)> = scan
            .files
            .par_iter()
            .map(|file| {
                let mut file_diagnostics = Diagnostics::for_file(self.display_path(&file.path));
                let records = self
                    .extract_file(&file.path, file.kind, &mut file_diagnostics)
                    .unwrap_or_else(|err| {
                        file_diagnostics.error(format!("{:#}", err));
                        Vec::new()
                    });
                (records, file_diagnostics)
            })
            .collect();

        let mut files = BTreeMap::new();
        for file in &scan.files {
            *files.entry(file.kind).or_insert(0) += 1;
        }

        let mut records = Vec::new();
        for (file_records, file_diagnostics) in results {
            records.extend(file_records);
            diagnostics.append(file_diagnostics);
        }
        let records_found = records.len();

        let existing = read_catalog(&output)?;
        let catalog = build_catalog(records, &existing, &mut diagnostics);
        diagnostics.info(format!(
            "Parsed {} file(s), {} unique string(s) to localize",
            scan.files.len(),
            catalog.len()
        ));
        diagnostics.info(format!("FINISHED {}", output.display()));

        Ok(TargetOutcome {
            output,
            files,
            records_found,
            catalog,
            diagnostics,
        })
    }

    /// `path` relative to the project root when possible.
    pub fn display_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root_dir)
            .unwrap_or(path)
            .to_path_buf()
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
