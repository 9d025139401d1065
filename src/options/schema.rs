//! Option schema registry
//!
//! Every supported poppler operation is described as data: the binary it
//! runs, how its output positional behaves, and the ordered table of options
//! it accepts. The validator and argument builder are generic over these
//! tables, so adding an option is a one-line change here.

use super::version::Version;
use std::fmt;

/// Value type an option accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Boolean,
    Number,
    String,
}

impl OptionType {
    pub fn as_str(self) -> &'static str {
        match self {
            OptionType::Boolean => "boolean",
            OptionType::Number => "number",
            OptionType::String => "string",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an option expands on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagTemplate {
    /// Boolean: the flag is emitted when the value is `true`
    Switch(&'static str),
    /// Number/string: the flag followed by the stringified value
    Valued(&'static str),
    /// Consumed by the wrapper itself, never reaches argv
    Local,
}

/// How a string option's value touches the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    /// The binary reads the named file
    Input,
    /// The binary writes to the named file or directory
    Output,
}

/// One recognised option
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub name: &'static str,
    pub kind: OptionType,
    pub flag: FlagTemplate,
    /// First binary version that understands the flag
    pub since: Option<Version>,
    /// Set when the value is a filesystem path
    pub path: Option<PathRole>,
}

impl OptionSpec {
    pub const fn switch(name: &'static str, flag: &'static str) -> Self {
        Self {
            name,
            kind: OptionType::Boolean,
            flag: FlagTemplate::Switch(flag),
            since: None,
            path: None,
        }
    }

    pub const fn number(name: &'static str, flag: &'static str) -> Self {
        Self {
            name,
            kind: OptionType::Number,
            flag: FlagTemplate::Valued(flag),
            since: None,
            path: None,
        }
    }

    pub const fn string(name: &'static str, flag: &'static str) -> Self {
        Self {
            name,
            kind: OptionType::String,
            flag: FlagTemplate::Valued(flag),
            since: None,
            path: None,
        }
    }

    pub const fn local(name: &'static str, kind: OptionType) -> Self {
        Self {
            name,
            kind,
            flag: FlagTemplate::Local,
            since: None,
            path: None,
        }
    }

    pub const fn since(self, major: u32, minor: u32, patch: u32) -> Self {
        Self {
            since: Some(Version::new(major, minor, patch)),
            ..self
        }
    }

    /// The value names a file the binary reads
    pub const fn reads_path(self) -> Self {
        Self {
            path: Some(PathRole::Input),
            ..self
        }
    }

    /// The value names a file or directory the binary writes
    pub const fn writes_path(self) -> Self {
        Self {
            path: Some(PathRole::Output),
            ..self
        }
    }
}

/// What happens to the output positional
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputRule {
    /// The binary takes no output positional
    None,
    /// Output may be omitted; nothing is appended then
    Optional,
    /// Output may be omitted; `-` is appended and stdout captured
    StdoutDash,
    /// Omitting the output is a usage violation
    Required,
}

/// What a successful call resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessReport {
    /// `"No Error"` when an output was written, captured stdout otherwise
    Marker,
    /// Captured stdout, always (progress-reporting binaries)
    Stdout,
}

/// How captured stdout becomes a string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdoutEncoding {
    /// UTF-8, invalid sequences replaced
    Text,
    /// One char per byte (Latin-1), lossless for image/PDF streams
    Binary,
}

/// Supported poppler operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    PdfAttach,
    PdfDetach,
    PdfFonts,
    PdfImages,
    PdfInfo,
    PdfSeparate,
    PdfToCairo,
    PdfToHtml,
    PdfToPpm,
    PdfToPs,
    PdfToText,
    PdfUnite,
}

impl Operation {
    pub const ALL: [Operation; 12] = [
        Operation::PdfAttach,
        Operation::PdfDetach,
        Operation::PdfFonts,
        Operation::PdfImages,
        Operation::PdfInfo,
        Operation::PdfSeparate,
        Operation::PdfToCairo,
        Operation::PdfToHtml,
        Operation::PdfToPpm,
        Operation::PdfToPs,
        Operation::PdfToText,
        Operation::PdfUnite,
    ];

    /// Schema lookup, total over every operation
    pub fn schema(self) -> &'static OperationSchema {
        match self {
            Operation::PdfAttach => &PDF_ATTACH,
            Operation::PdfDetach => &PDF_DETACH,
            Operation::PdfFonts => &PDF_FONTS,
            Operation::PdfImages => &PDF_IMAGES,
            Operation::PdfInfo => &PDF_INFO,
            Operation::PdfSeparate => &PDF_SEPARATE,
            Operation::PdfToCairo => &PDF_TO_CAIRO,
            Operation::PdfToHtml => &PDF_TO_HTML,
            Operation::PdfToPpm => &PDF_TO_PPM,
            Operation::PdfToPs => &PDF_TO_PS,
            Operation::PdfToText => &PDF_TO_TEXT,
            Operation::PdfUnite => &PDF_UNITE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::PdfAttach => "pdfAttach",
            Operation::PdfDetach => "pdfDetach",
            Operation::PdfFonts => "pdfFonts",
            Operation::PdfImages => "pdfImages",
            Operation::PdfInfo => "pdfInfo",
            Operation::PdfSeparate => "pdfSeparate",
            Operation::PdfToCairo => "pdfToCairo",
            Operation::PdfToHtml => "pdfToHtml",
            Operation::PdfToPpm => "pdfToPpm",
            Operation::PdfToPs => "pdfToPs",
            Operation::PdfToText => "pdfToText",
            Operation::PdfUnite => "pdfUnite",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declarative description of one operation
#[derive(Debug)]
pub struct OperationSchema {
    pub operation: Operation,
    /// Binary file name without platform suffix
    pub binary: &'static str,
    pub output: OutputRule,
    pub report: SuccessReport,
    pub stdout: StdoutEncoding,
    /// Options in the order they are emitted
    pub options: &'static [OptionSpec],
}

impl OperationSchema {
    pub fn option(&self, name: &str) -> Option<&'static OptionSpec> {
        self.options.iter().find(|spec| spec.name == name)
    }

    /// True if at least one option is version-gated
    pub fn has_gated_options(&self) -> bool {
        self.options.iter().any(|spec| spec.since.is_some())
    }
}

// ============================================================================
// Schemas
// ============================================================================

static PDF_ATTACH: OperationSchema = OperationSchema {
    operation: Operation::PdfAttach,
    binary: "pdfattach",
    output: OutputRule::Required,
    report: SuccessReport::Marker,
    stdout: StdoutEncoding::Text,
    options: &[
        OptionSpec::switch("printVersionInfo", "-v"),
        OptionSpec::switch("replace", "-replace"),
    ],
};

static PDF_DETACH: OperationSchema = OperationSchema {
    operation: Operation::PdfDetach,
    binary: "pdfdetach",
    output: OutputRule::None,
    report: SuccessReport::Stdout,
    stdout: StdoutEncoding::Text,
    options: &[
        OptionSpec::switch("listEmbedded", "-list"),
        OptionSpec::string("outputEncoding", "-enc"),
        OptionSpec::string("outputPath", "-o").writes_path(),
        OptionSpec::string("ownerPassword", "-opw"),
        OptionSpec::switch("printVersionInfo", "-v"),
        OptionSpec::switch("saveAllFiles", "-saveall"),
        OptionSpec::string("saveFile", "-savefile").since(0, 86, 0),
        OptionSpec::number("saveSpecificFile", "-save"),
        OptionSpec::string("userPassword", "-upw"),
    ],
};

static PDF_FONTS: OperationSchema = OperationSchema {
    operation: Operation::PdfFonts,
    binary: "pdffonts",
    output: OutputRule::None,
    report: SuccessReport::Stdout,
    stdout: StdoutEncoding::Text,
    options: &[
        OptionSpec::number("firstPageToExamine", "-f"),
        OptionSpec::number("lastPageToExamine", "-l"),
        OptionSpec::switch("listSubstitutes", "-subst"),
        OptionSpec::string("ownerPassword", "-opw"),
        OptionSpec::switch("printVersionInfo", "-v"),
        OptionSpec::string("userPassword", "-upw"),
    ],
};

static PDF_IMAGES: OperationSchema = OperationSchema {
    operation: Operation::PdfImages,
    binary: "pdfimages",
    output: OutputRule::Optional,
    report: SuccessReport::Marker,
    stdout: StdoutEncoding::Text,
    options: &[
        OptionSpec::switch("allFiles", "-all"),
        OptionSpec::switch("ccittFile", "-ccitt"),
        OptionSpec::number("firstPageToConvert", "-f"),
        OptionSpec::switch("includePageNumbers", "-p"),
        OptionSpec::switch("jbig2File", "-jbig2"),
        OptionSpec::switch("jpeg2000File", "-jp2"),
        OptionSpec::switch("jpegFile", "-j"),
        OptionSpec::number("lastPageToConvert", "-l"),
        OptionSpec::switch("list", "-list"),
        OptionSpec::string("ownerPassword", "-opw"),
        OptionSpec::switch("pngFile", "-png"),
        OptionSpec::switch("printVersionInfo", "-v"),
        OptionSpec::switch("tiffFile", "-tiff"),
        OptionSpec::string("userPassword", "-upw"),
    ],
};

/// Name of the pdfInfo option that turns stdout into a JSON object
pub const PRINT_AS_JSON: &str = "printAsJson";

static PDF_INFO: OperationSchema = OperationSchema {
    operation: Operation::PdfInfo,
    binary: "pdfinfo",
    output: OutputRule::None,
    report: SuccessReport::Stdout,
    stdout: StdoutEncoding::Text,
    options: &[
        OptionSpec::number("firstPageToConvert", "-f"),
        OptionSpec::number("lastPageToConvert", "-l"),
        OptionSpec::switch("listEncodingOptions", "-listenc"),
        OptionSpec::string("outputEncoding", "-enc"),
        OptionSpec::string("ownerPassword", "-opw"),
        OptionSpec::local(PRINT_AS_JSON, OptionType::Boolean),
        OptionSpec::switch("printBoundingBoxes", "-box"),
        OptionSpec::switch("printDocStruct", "-struct"),
        OptionSpec::switch("printDocStructText", "-struct-text"),
        OptionSpec::switch("printIsoDates", "-isodates"),
        OptionSpec::switch("printJS", "-js"),
        OptionSpec::switch("printMetadata", "-meta"),
        OptionSpec::switch("printNamedDests", "-dests"),
        OptionSpec::switch("printRawDates", "-rawdates"),
        OptionSpec::switch("printUrls", "-url").since(21, 11, 0),
        OptionSpec::switch("printVersionInfo", "-v"),
        OptionSpec::string("userPassword", "-upw"),
    ],
};

static PDF_SEPARATE: OperationSchema = OperationSchema {
    operation: Operation::PdfSeparate,
    binary: "pdfseparate",
    output: OutputRule::Required,
    report: SuccessReport::Marker,
    stdout: StdoutEncoding::Text,
    options: &[
        OptionSpec::number("firstPageToExtract", "-f"),
        OptionSpec::number("lastPageToExtract", "-l"),
        OptionSpec::switch("printVersionInfo", "-v"),
    ],
};

static PDF_TO_CAIRO: OperationSchema = OperationSchema {
    operation: Operation::PdfToCairo,
    binary: "pdftocairo",
    output: OutputRule::StdoutDash,
    report: SuccessReport::Marker,
    stdout: StdoutEncoding::Binary,
    options: &[
        OptionSpec::string("antialias", "-antialias"),
        OptionSpec::switch("cropBox", "-cropbox"),
        OptionSpec::number("cropHeight", "-H"),
        OptionSpec::number("cropSize", "-sz"),
        OptionSpec::number("cropWidth", "-W"),
        OptionSpec::number("cropXAxis", "-x"),
        OptionSpec::number("cropYAxis", "-y"),
        OptionSpec::switch("duplex", "-duplex"),
        OptionSpec::switch("epsFile", "-eps"),
        OptionSpec::switch("evenPagesOnly", "-e"),
        OptionSpec::switch("fillPage", "-expand"),
        OptionSpec::number("firstPageToConvert", "-f"),
        OptionSpec::switch("grayscaleFile", "-gray"),
        OptionSpec::string("iccFile", "-icc").reads_path(),
        OptionSpec::switch("jpegFile", "-jpeg"),
        OptionSpec::string("jpegOptions", "-jpegopt"),
        OptionSpec::number("lastPageToConvert", "-l"),
        OptionSpec::switch("monochromeFile", "-mono"),
        OptionSpec::switch("noCenter", "-nocenter"),
        OptionSpec::switch("noCrop", "-nocrop"),
        OptionSpec::switch("noShrink", "-noshrink"),
        OptionSpec::switch("oddPagesOnly", "-o"),
        OptionSpec::switch("originalPageSizes", "-origpagesizes"),
        OptionSpec::string("ownerPassword", "-opw"),
        OptionSpec::number("paperHeight", "-paperh"),
        OptionSpec::string("paperSize", "-paper"),
        OptionSpec::number("paperWidth", "-paperw"),
        OptionSpec::switch("pdfFile", "-pdf"),
        OptionSpec::switch("pngFile", "-png"),
        OptionSpec::switch("printVersionInfo", "-v"),
        OptionSpec::switch("psFile", "-ps"),
        OptionSpec::switch("psLevel2", "-level2"),
        OptionSpec::switch("psLevel3", "-level3"),
        OptionSpec::switch("quiet", "-q"),
        OptionSpec::number("resolutionXAxis", "-rx"),
        OptionSpec::number("resolutionXYAxis", "-r"),
        OptionSpec::number("resolutionYAxis", "-ry"),
        OptionSpec::number("scalePageTo", "-scale-to"),
        OptionSpec::number("scalePageToXAxis", "-scale-to-x"),
        OptionSpec::number("scalePageToYAxis", "-scale-to-y"),
        OptionSpec::switch("singleFile", "-singlefile"),
        OptionSpec::switch("svgFile", "-svg"),
        OptionSpec::string("tiffCompression", "-tiffcompression"),
        OptionSpec::switch("tiffFile", "-tiff"),
        OptionSpec::switch("transparentPageColor", "-transp"),
        OptionSpec::string("userPassword", "-upw"),
    ],
};

static PDF_TO_HTML: OperationSchema = OperationSchema {
    operation: Operation::PdfToHtml,
    binary: "pdftohtml",
    output: OutputRule::Optional,
    report: SuccessReport::Stdout,
    stdout: StdoutEncoding::Text,
    options: &[
        OptionSpec::switch("complexOutput", "-c"),
        OptionSpec::switch("dataUrls", "-dataurls").since(0, 75, 0),
        OptionSpec::switch("exchangePdfLinks", "-p"),
        OptionSpec::switch("extractHidden", "-hidden"),
        OptionSpec::number("firstPageToConvert", "-f"),
        OptionSpec::switch("fontFullName", "-fontfullname"),
        OptionSpec::switch("ignoreImages", "-i"),
        OptionSpec::string("imageFormat", "-fmt"),
        OptionSpec::number("lastPageToConvert", "-l"),
        OptionSpec::switch("noDrm", "-nodrm"),
        OptionSpec::switch("noFrames", "-noframes"),
        OptionSpec::switch("noMergeParagraph", "-nomerge"),
        OptionSpec::switch("noRoundedCoordinates", "-noroundcoord"),
        OptionSpec::string("outputEncoding", "-enc"),
        OptionSpec::string("ownerPassword", "-opw"),
        OptionSpec::switch("printVersionInfo", "-v"),
        OptionSpec::switch("quiet", "-q"),
        OptionSpec::switch("singlePage", "-s"),
        OptionSpec::switch("stdout", "-stdout"),
        OptionSpec::string("userPassword", "-upw"),
        OptionSpec::number("wordBreakThreshold", "-wbt"),
        OptionSpec::switch("xmlOutput", "-xml"),
        OptionSpec::number("zoom", "-zoom"),
    ],
};

static PDF_TO_PPM: OperationSchema = OperationSchema {
    operation: Operation::PdfToPpm,
    binary: "pdftoppm",
    output: OutputRule::Optional,
    report: SuccessReport::Marker,
    stdout: StdoutEncoding::Binary,
    options: &[
        OptionSpec::string("antialiasFonts", "-aa"),
        OptionSpec::string("antialiasVectors", "-aaVector"),
        OptionSpec::switch("cropBox", "-cropbox"),
        OptionSpec::number("cropHeight", "-H"),
        OptionSpec::number("cropSize", "-sz"),
        OptionSpec::number("cropWidth", "-W"),
        OptionSpec::number("cropXAxis", "-x"),
        OptionSpec::number("cropYAxis", "-y"),
        OptionSpec::string("defaultCmykProfile", "-defaultcmykprofile")
            .since(21, 1, 0)
            .reads_path(),
        OptionSpec::string("defaultGrayProfile", "-defaultgrayprofile")
            .since(21, 1, 0)
            .reads_path(),
        OptionSpec::string("defaultRgbProfile", "-defaultrgbprofile").since(21, 1, 0).reads_path(),
        OptionSpec::string("displayProfile", "-displayprofile").since(0, 90, 0).reads_path(),
        OptionSpec::switch("evenPagesOnly", "-e"),
        OptionSpec::number("firstPageToConvert", "-f"),
        OptionSpec::switch("forcePageNumber", "-forcenum").since(0, 75, 0),
        OptionSpec::string("freetype", "-freetype"),
        OptionSpec::switch("grayscaleFile", "-gray"),
        OptionSpec::switch("hideAnnotations", "-hide-annotations").since(0, 84, 0),
        OptionSpec::switch("jpegFile", "-jpeg"),
        OptionSpec::string("jpegOptions", "-jpegopt"),
        OptionSpec::number("lastPageToConvert", "-l"),
        OptionSpec::switch("monochromeFile", "-mono"),
        OptionSpec::switch("oddPagesOnly", "-o"),
        OptionSpec::string("ownerPassword", "-opw"),
        OptionSpec::switch("pngFile", "-png"),
        OptionSpec::switch("printProgress", "-progress").since(21, 3, 0),
        OptionSpec::switch("printVersionInfo", "-v"),
        OptionSpec::switch("quiet", "-q"),
        OptionSpec::number("resolutionXAxis", "-rx"),
        OptionSpec::number("resolutionXYAxis", "-r"),
        OptionSpec::number("resolutionYAxis", "-ry"),
        OptionSpec::number("scalePageTo", "-scale-to"),
        OptionSpec::number("scalePageToXAxis", "-scale-to-x"),
        OptionSpec::number("scalePageToYAxis", "-scale-to-y"),
        OptionSpec::string("separator", "-sep").since(0, 75, 0),
        OptionSpec::switch("singleFile", "-singlefile"),
        OptionSpec::string("thinLineMode", "-thinlinemode"),
        OptionSpec::string("tiffCompression", "-tiffcompression"),
        OptionSpec::switch("tiffFile", "-tiff"),
        OptionSpec::string("userPassword", "-upw"),
    ],
};

static PDF_TO_PS: OperationSchema = OperationSchema {
    operation: Operation::PdfToPs,
    binary: "pdftops",
    output: OutputRule::StdoutDash,
    report: SuccessReport::Marker,
    stdout: StdoutEncoding::Text,
    options: &[
        OptionSpec::string("antialias", "-aaRaster"),
        OptionSpec::switch("binary", "-binary"),
        OptionSpec::string("defaultCmykProfile", "-defaultcmykprofile")
            .since(21, 1, 0)
            .reads_path(),
        OptionSpec::string("defaultGrayProfile", "-defaultgrayprofile")
            .since(21, 1, 0)
            .reads_path(),
        OptionSpec::string("defaultRgbProfile", "-defaultrgbprofile").since(21, 1, 0).reads_path(),
        OptionSpec::switch("duplex", "-duplex"),
        OptionSpec::switch("epsFile", "-eps"),
        OptionSpec::switch("fillPage", "-expand"),
        OptionSpec::number("firstPageToConvert", "-f"),
        OptionSpec::switch("form", "-form"),
        OptionSpec::number("lastPageToConvert", "-l"),
        OptionSpec::switch("level1", "-level1"),
        OptionSpec::switch("level1Sep", "-level1sep"),
        OptionSpec::switch("level2", "-level2"),
        OptionSpec::switch("level2Sep", "-level2sep"),
        OptionSpec::switch("level3", "-level3"),
        OptionSpec::switch("level3Sep", "-level3sep"),
        OptionSpec::switch("noCenter", "-nocenter"),
        OptionSpec::switch("noCrop", "-nocrop"),
        OptionSpec::switch("noEmbedCIDFonts", "-noembcidps"),
        OptionSpec::switch("noEmbedCIDTrueTypeFonts", "-noembcidtt"),
        OptionSpec::switch("noEmbedTrueTypeFonts", "-noembtt"),
        OptionSpec::switch("noEmbedType1Fonts", "-noembt1"),
        OptionSpec::switch("noShrink", "-noshrink"),
        OptionSpec::switch("opi", "-opi"),
        OptionSpec::switch("optimizecolorspace", "-optimizecolorspace"),
        OptionSpec::switch("originalPageSizes", "-origpagesizes"),
        OptionSpec::switch("overprint", "-overprint"),
        OptionSpec::string("ownerPassword", "-opw"),
        OptionSpec::number("paperHeight", "-paperh"),
        OptionSpec::string("paperSize", "-paper"),
        OptionSpec::number("paperWidth", "-paperw"),
        OptionSpec::switch("passfonts", "-passfonts"),
        OptionSpec::switch("preload", "-preload"),
        OptionSpec::switch("printVersionInfo", "-v"),
        OptionSpec::string("processColorFormat", "-processcolorformat"),
        OptionSpec::string("processColorProfile", "-processcolorprofile").reads_path(),
        OptionSpec::switch("quiet", "-q"),
        OptionSpec::string("rasterize", "-rasterize"),
        OptionSpec::number("resolutionXYAxis", "-r"),
        OptionSpec::string("userPassword", "-upw"),
    ],
};

static PDF_TO_TEXT: OperationSchema = OperationSchema {
    operation: Operation::PdfToText,
    binary: "pdftotext",
    output: OutputRule::StdoutDash,
    report: SuccessReport::Marker,
    stdout: StdoutEncoding::Text,
    options: &[
        OptionSpec::switch("boundingBoxXhtml", "-bbox"),
        OptionSpec::switch("boundingBoxXhtmlLayout", "-bbox-layout"),
        OptionSpec::switch("cropBox", "-cropbox").since(21, 3, 0),
        OptionSpec::number("cropHeight", "-H"),
        OptionSpec::number("cropWidth", "-W"),
        OptionSpec::number("cropXAxis", "-x"),
        OptionSpec::number("cropYAxis", "-y"),
        OptionSpec::string("eolConvention", "-eol"),
        OptionSpec::number("firstPageToConvert", "-f"),
        OptionSpec::number("fixedWidthLayout", "-fixed"),
        OptionSpec::switch("generateHtmlMetaFile", "-htmlmeta"),
        OptionSpec::switch("generateTsvFile", "-tsv"),
        OptionSpec::number("lastPageToConvert", "-l"),
        OptionSpec::switch("listEncodingOptions", "-listenc"),
        OptionSpec::switch("maintainLayout", "-layout"),
        OptionSpec::switch("noDiagonalText", "-nodiag").since(0, 80, 0),
        OptionSpec::switch("noPageBreaks", "-nopgbrk"),
        OptionSpec::string("outputEncoding", "-enc"),
        OptionSpec::string("ownerPassword", "-opw"),
        OptionSpec::switch("printVersionInfo", "-v"),
        OptionSpec::switch("quiet", "-q"),
        OptionSpec::switch("rawLayout", "-raw"),
        OptionSpec::string("userPassword", "-upw"),
    ],
};

static PDF_UNITE: OperationSchema = OperationSchema {
    operation: Operation::PdfUnite,
    binary: "pdfunite",
    output: OutputRule::Required,
    report: SuccessReport::Marker,
    stdout: StdoutEncoding::Text,
    options: &[OptionSpec::switch("printVersionInfo", "-v")],
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_operation_has_a_schema() {
        for op in Operation::ALL {
            let schema = op.schema();
            assert_eq!(schema.operation, op);
            assert!(!schema.binary.is_empty());
            assert!(!schema.options.is_empty(), "{} has no options", op);
        }
    }

    #[test]
    fn test_option_names_unique_per_schema() {
        for op in Operation::ALL {
            let mut seen = HashSet::new();
            for spec in op.schema().options {
                assert!(seen.insert(spec.name), "{}: duplicate {}", op, spec.name);
            }
        }
    }

    #[test]
    fn test_flag_template_matches_type() {
        for op in Operation::ALL {
            for spec in op.schema().options {
                match spec.flag {
                    FlagTemplate::Switch(flag) => {
                        assert_eq!(spec.kind, OptionType::Boolean, "{}.{}", op, spec.name);
                        assert!(flag.starts_with('-'));
                    }
                    FlagTemplate::Valued(flag) => {
                        assert_ne!(spec.kind, OptionType::Boolean, "{}.{}", op, spec.name);
                        assert!(flag.starts_with('-'));
                    }
                    FlagTemplate::Local => {}
                }
            }
        }
    }

    #[test]
    fn test_option_lookup() {
        let schema = Operation::PdfToPpm.schema();
        let spec = schema.option("printProgress").unwrap();
        assert_eq!(spec.flag, FlagTemplate::Switch("-progress"));
        assert_eq!(spec.since, Some(Version::new(21, 3, 0)));
        assert!(schema.option("wordFile").is_none());
        assert!(schema.has_gated_options());
        assert!(!Operation::PdfUnite.schema().has_gated_options());
    }

    #[test]
    fn test_no_schema_knows_word_file() {
        for op in Operation::ALL {
            assert!(op.schema().option("wordFile").is_none());
        }
    }

    #[test]
    fn test_output_rules() {
        assert_eq!(Operation::PdfUnite.schema().output, OutputRule::Required);
        assert_eq!(Operation::PdfToCairo.schema().output, OutputRule::StdoutDash);
        assert_eq!(Operation::PdfImages.schema().output, OutputRule::Optional);
        assert_eq!(Operation::PdfToPpm.schema().output, OutputRule::Optional);
        assert_eq!(Operation::PdfInfo.schema().output, OutputRule::None);
        assert_eq!(Operation::PdfToHtml.schema().report, SuccessReport::Stdout);
    }

    #[test]
    fn test_path_options_are_strings() {
        for op in Operation::ALL {
            for spec in op.schema().options {
                if spec.path.is_some() {
                    assert_eq!(spec.kind, OptionType::String, "{}.{}", op, spec.name);
                }
            }
        }
    }

    #[test]
    fn test_path_roles() {
        let role = |op: Operation, name: &str| op.schema().option(name).and_then(|spec| spec.path);
        assert_eq!(role(Operation::PdfDetach, "outputPath"), Some(PathRole::Output));
        assert_eq!(role(Operation::PdfToCairo, "iccFile"), Some(PathRole::Input));
        assert_eq!(role(Operation::PdfToPpm, "displayProfile"), Some(PathRole::Input));
        assert_eq!(role(Operation::PdfToPs, "processColorProfile"), Some(PathRole::Input));
        // An embedded file's name, not a filesystem path
        assert_eq!(role(Operation::PdfDetach, "saveFile"), None);
    }
}
