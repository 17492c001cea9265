/// Prints the worldclock header with version, used by init and doctor.
pub fn print_logo() {
    let c = "\x1b[1;97m"; // bold bright white
    let d = "\x1b[90m"; // dim gray
    let r = "\x1b[0m"; // Reset
    let v = env!("CARGO_PKG_VERSION");

    println!();
    println!("  {c}◷  worldclock{r}  {d}v{v}{r}");
}
