extern crate wikihelp;

fn main() {
    wikihelp::load();
    let result = match std::env::args().nth(1) {
        None => wikihelp::run(),
        Some(s) => match s.as_str() {
            "--offline" | "-o" => wikihelp::offline(),
            _                  => return eprintln!("Unknown flag {}", s)
        }
    };
    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
