fn main() {
    burrow::cli::run();
}
