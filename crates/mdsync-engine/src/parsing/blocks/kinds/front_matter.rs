/// YAML front matter: `---` on the very first line, closed by `---` or `...`.
pub struct FrontMatter;

impl FrontMatter {
    pub const OPEN: &'static str = "---";
    pub const CLOSE: [&'static str; 2] = ["---", "..."];

    pub fn opens(line: &str) -> bool {
        line.trim_end() == Self::OPEN
    }

    pub fn closes(line: &str) -> bool {
        Self::CLOSE.contains(&line.trim_end())
    }
}
