/// The registers that instructions can read from, write to, transfer
/// between, push or pull. `P` and `SP` are included alongside `A`/`X`/`Y`
/// so that `TSX`/`TXS`/`PHP`/`PLP`/`PHA`/`PLA` can share the same
/// `read_register`/`write_register` plumbing as everything else.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Register {
    A,
    X,
    Y,
    P,
    SP,
}
