/// Drops the absent entries of a list, keeping the order of the present ones.
pub(crate) fn compact<T, I>(items: I) -> Vec<T>
where
    I: IntoIterator<Item = Option<T>>,
{
    items.into_iter().flatten().collect()
}
