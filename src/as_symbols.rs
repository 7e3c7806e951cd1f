/// The `AsSymbols` trait allows a type to be used as a key in a `Trie`.
///
/// It flattens the key into the sequence of symbols the trie branches on.
/// Strings yield their `char`s, sequences yield their elements.
///
pub trait AsSymbols<S> {
    /// Returns the symbols of the key in order.
    fn symbols(&self) -> impl Iterator<Item = S>;

    fn symbols_vec(&self) -> Vec<S> {
        self.symbols().collect()
    }
}

impl AsSymbols<char> for str {
    fn symbols(&self) -> impl Iterator<Item = char> {
        self.chars()
    }
}

impl AsSymbols<char> for String {
    fn symbols(&self) -> impl Iterator<Item = char> {
        self.as_str().chars()
    }
}

impl<T: Clone> AsSymbols<T> for [T] {
    fn symbols(&self) -> impl Iterator<Item = T> {
        self.iter().cloned()
    }
}

impl<T: Clone> AsSymbols<T> for Vec<T> {
    fn symbols(&self) -> impl Iterator<Item = T> {
        self.iter().cloned()
    }
}

impl<T: Clone> AsSymbols<T> for Box<[T]> {
    fn symbols(&self) -> impl Iterator<Item = T> {
        self.iter().cloned()
    }
}

impl<const N: usize, T: Clone> AsSymbols<T> for [T; N] {
    fn symbols(&self) -> impl Iterator<Item = T> {
        self.as_slice().iter().cloned()
    }
}

impl<S, K: AsSymbols<S> + ?Sized> AsSymbols<S> for &K {
    fn symbols(&self) -> impl Iterator<Item = S> {
        K::symbols(*self)
    }
}
