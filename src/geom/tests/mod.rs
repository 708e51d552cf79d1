mod test_orbit_basic;
