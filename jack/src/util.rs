use color_print::cformat;

/// Print compiled VM code with one colored line per command.
pub fn print_dump(name: &str, vm: &str) {
    println!("------[{}]{}", name, "-".repeat(60usize.saturating_sub(name.len())));
    for (idx, line) in vm.lines().enumerate() {
        let mut words = line.split_whitespace();
        let head = words.next().unwrap_or("");
        let rest: Vec<&str> = words.collect();
        let body = match head {
            "function" => cformat!("<g,s>{}</>", line),
            "label" => cformat!("  <m>{}</>", line),
            "push" | "pop" => cformat!("    <r>{}</> <b>{}</>", head, rest.join(" ")),
            "call" => cformat!("    <r>call</> <g>{}</>", rest.join(" ")),
            "goto" | "if-goto" => cformat!("    <r>{}</> <m>{}</>", head, rest.join(" ")),
            _ => cformat!("    <r>{}</>", line),
        };
        println!("{:>4} | {}", idx + 1, body);
    }
}
