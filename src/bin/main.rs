fn main() {
  pdi_index::main();
}
