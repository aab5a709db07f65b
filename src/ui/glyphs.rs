#[derive(Clone, Copy, Debug)]
pub struct Glyphs {
    pub focus_marker: &'static str,
    pub cursor: &'static str,
    pub bullet: &'static str,
    pub success: &'static str,
    pub failure: &'static str,
    pub busy: &'static str,
}

pub fn select(fancy_requested: bool) -> Glyphs {
    if fancy_requested {
        fancy()
    } else {
        ascii()
    }
}

fn ascii() -> Glyphs {
    Glyphs {
        focus_marker: ">",
        cursor: "_",
        bullet: "-",
        success: "[ok]",
        failure: "[error]",
        busy: "...",
    }
}

fn fancy() -> Glyphs {
    Glyphs {
        focus_marker: "▶",
        cursor: "█",
        bullet: "•",
        success: "✔",
        failure: "✘",
        busy: "⏳",
    }
}
