use std::path::Path;

use super::blade::BladeScanner;
use super::candidate::{FileScan, FileType};
use super::dialect::{has_extension, DialectScanner};
use super::php::PhpScanner;

/// Content markers of a Volt single-file component
const VOLT_MARKERS: &[&str] = &[
    "new class extends Component",
    "Livewire\\Volt\\Component",
    "use function Livewire\\Volt\\",
];

/// Scanner for Volt components: a PHP class segment followed by a Blade segment
#[derive(Debug, Default, Clone, Copy)]
pub struct VoltScanner {
    php: PhpScanner,
    blade: BladeScanner,
}

impl VoltScanner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DialectScanner for VoltScanner {
    fn extensions(&self) -> &'static [&'static str] {
        &["blade.php"]
    }

    fn file_type(&self) -> FileType {
        FileType::Volt
    }

    fn can_handle(&self, path: &Path, content: &str) -> bool {
        has_extension(path, self.extensions())
            && content.contains("<?php")
            && VOLT_MARKERS.iter().any(|marker| content.contains(marker))
    }

    fn scan_file(&self, path: &Path, content: &str) -> FileScan {
        let lines: Vec<&str> = content.lines().collect();
        let mut scan = FileScan::default();

        let Some((start, end)) = script_segment(&lines) else {
            scan.extend(self.blade.scan_file(path, content));
            scan.retag(FileType::Volt);
            return scan;
        };

        if start > 0 {
            scan.extend(self.blade.scan_file(path, &lines[..start].join("\n")));
        }

        let mut script = self.php.scan_file(path, &lines[start..=end].join("\n"));
        script.rebase(start);
        scan.extend(script);

        if end + 1 < lines.len() {
            let mut template = self.blade.scan_file(path, &lines[end + 1..].join("\n"));
            template.rebase(end + 1);
            scan.extend(template);
        }

        scan.retag(FileType::Volt);
        scan
    }
}

/// Line indices of the `<?php` opener and its closing `?>` (inclusive)
fn script_segment(lines: &[&str]) -> Option<(usize, usize)> {
    let start = lines.iter().position(|line| line.contains("<?php"))?;
    let opener_end = lines[start].find("<?php").map_or(0, |pos| pos + 5);
    let end = if lines[start][opener_end..].contains("?>") {
        start
    } else {
        lines[start + 1..]
            .iter()
            .position(|line| line.contains("?>"))
            .map_or(lines.len() - 1, |rel| start + 1 + rel)
    };
    Some((start, end))
}
