use diesel::prelude::*;

use crate::{
    domain::currency::Currency,
    models::currency::Currency as DbCurrency,
    repository::{CurrencyReader, DieselRepository, errors::RepositoryResult},
};

impl CurrencyReader for DieselRepository {
    fn list_currencies(&self) -> RepositoryResult<Vec<Currency>> {
        use crate::schema::currencies;

        let mut conn = self.conn()?;

        let rows = currencies::table
            .select(DbCurrency::as_select())
            .order(currencies::code.asc())
            .load::<DbCurrency>(&mut *conn)?;

        let currencies = rows
            .into_iter()
            .map(Currency::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(currencies)
    }
}
